mod common;

use anyhow::Result;
use common::{closed_port_url, FakeServer};
use nccpa_checker::apis::nccpa::NccpaRegistry;
use nccpa_checker::apis::twilio::{TwilioClient, TwilioCredentials};
use nccpa_checker::app::ports::{NotifierPort, RegistryPort};
use nccpa_checker::common::error::CheckerError;
use nccpa_checker::common::types::{
    AccessToken, ByAttributesParams, ByIdParams, LookupParams, NotificationPayload,
};
use serde_json::json;

fn by_id(id: &str) -> LookupParams {
    LookupParams::ById(ByIdParams { id: id.into(), token: AccessToken::new("tok-123") })
}

fn by_name(first: &str, last: &str) -> LookupParams {
    LookupParams::ByAttributes(ByAttributesParams {
        first_name: first.into(),
        last_name: last.into(),
        country_code: "USA".into(),
        state_code: "CA".into(),
        token: AccessToken::new("tok-123"),
    })
}

fn registry(server: &FakeServer) -> NccpaRegistry {
    NccpaRegistry::with_base_url(reqwest::Client::new(), format!("{}/verifypac", server.base_url))
}

#[tokio::test]
async fn search_by_id_posts_id_and_token() -> Result<()> {
    let server = FakeServer::json(
        200,
        json!({
            "Name": "Jane Doe",
            "CertificationStatus": "Certified",
            "CertificationMessage": "Jane Doe is certified"
        }),
    )
    .await;

    let record = registry(&server).lookup(&by_id("12345")).await?;

    assert_eq!(record.name, "Jane Doe");
    assert_eq!(record.certification_status, "Certified");
    assert_eq!(record.certification_message, "Jane Doe is certified");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].path, "/verifypac/SearchById");
    assert!(requests[0].header("content-type").unwrap_or_default().starts_with("application/json"));
    assert_eq!(requests[0].json(), json!({"id": "12345", "token": "tok-123"}));
    Ok(())
}

#[tokio::test]
async fn search_by_id_without_name_is_not_found() {
    let server = FakeServer::json(200, json!({"Name": "", "CertificationStatus": null})).await;
    let err = registry(&server).lookup(&by_id("99999")).await.unwrap_err();
    assert!(matches!(err, CheckerError::NotFound { ref query } if query.contains("99999")));
}

#[tokio::test]
async fn search_by_id_null_body_is_not_found() {
    let server = FakeServer::json(200, serde_json::Value::Null).await;
    let err = registry(&server).lookup(&by_id("99999")).await.unwrap_err();
    assert!(matches!(err, CheckerError::NotFound { .. }));
}

#[tokio::test]
async fn search_by_attributes_posts_camel_case_body() -> Result<()> {
    let server = FakeServer::json(
        200,
        json!([{"Name": "John Smith", "CertificationStatus": "Pending"}]),
    )
    .await;

    let record = registry(&server).lookup(&by_name("John", "Smith")).await?;
    assert_eq!(record.name, "John Smith");
    assert_eq!(record.certification_status, "Pending");

    let requests = server.requests();
    assert_eq!(requests[0].path, "/verifypac/SearchByAttributes");
    assert_eq!(
        requests[0].json(),
        json!({
            "firstName": "John",
            "lastName": "Smith",
            "countryCode": "USA",
            "stateCode": "CA",
            "token": "tok-123"
        })
    );
    Ok(())
}

#[tokio::test]
async fn search_by_attributes_with_no_match_is_not_found() {
    let server = FakeServer::json(200, json!([])).await;
    let err = registry(&server).lookup(&by_name("John", "Smith")).await.unwrap_err();
    assert!(matches!(err, CheckerError::NotFound { .. }));
}

#[tokio::test]
async fn search_by_attributes_with_two_matches_is_ambiguous() {
    let server = FakeServer::json(
        200,
        json!([
            {"Name": "John Smith", "CertificationStatus": "Certified"},
            {"Name": "John Smith", "CertificationStatus": "Pending"}
        ]),
    )
    .await;
    let err = registry(&server).lookup(&by_name("John", "Smith")).await.unwrap_err();
    assert!(matches!(err, CheckerError::AmbiguousMatch { count: 2, .. }));
}

#[tokio::test]
async fn server_error_is_reported_as_transient() {
    let server = FakeServer::start(vec![(503, "upstream unavailable".to_string())]).await;
    let err = registry(&server).lookup(&by_id("12345")).await.unwrap_err();
    assert!(matches!(err, CheckerError::RegistryStatus { status: 503, ref body } if body == "upstream unavailable"));
    assert!(err.is_transient());
}

#[tokio::test]
async fn garbage_body_is_a_decode_error() {
    let server = FakeServer::start(vec![(200, "<html>maintenance</html>".to_string())]).await;
    let err = registry(&server).lookup(&by_id("12345")).await.unwrap_err();
    assert!(matches!(err, CheckerError::Json(_)));
    assert!(!err.is_transient());
}

#[tokio::test]
async fn connection_refused_is_transient() {
    let registry = NccpaRegistry::with_base_url(reqwest::Client::new(), closed_port_url().await);
    let err = registry.lookup(&by_id("12345")).await.unwrap_err();
    assert!(matches!(err, CheckerError::Http(_)));
    assert!(err.is_transient());
}

fn twilio(server: &FakeServer) -> TwilioClient {
    TwilioClient::with_api_base(
        reqwest::Client::new(),
        TwilioCredentials { account_sid: "AC123".into(), auth_token: "secret".into() },
        &server.base_url,
    )
}

fn payload() -> NotificationPayload {
    NotificationPayload {
        to: "+15550000002".into(),
        from: "+15550000001".into(),
        body: "Jane Doe is certified".into(),
    }
}

#[tokio::test]
async fn twilio_send_posts_form_with_basic_auth() -> Result<()> {
    let server = FakeServer::json(201, json!({"sid": "SM42", "status": "queued"})).await;

    let receipt = twilio(&server).send(&payload()).await?;
    assert_eq!(receipt.message_id, "SM42");
    assert_eq!(receipt.status, "queued");

    let requests = server.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/2010-04-01/Accounts/AC123/Messages.json");
    assert!(requests[0].header("authorization").unwrap_or_default().starts_with("Basic "));
    assert_eq!(requests[0].header("content-type"), Some("application/x-www-form-urlencoded"));
    assert!(requests[0].body.contains("To=%2B15550000002"));
    assert!(requests[0].body.contains("From=%2B15550000001"));
    assert!(requests[0].body.contains("Body=Jane+Doe+is+certified"));
    Ok(())
}

#[tokio::test]
async fn twilio_error_document_becomes_notify_error() {
    let server = FakeServer::json(
        400,
        json!({"code": 21211, "message": "The 'To' number is not a valid phone number.", "status": 400}),
    )
    .await;

    let err = twilio(&server).send(&payload()).await.unwrap_err();
    match err {
        CheckerError::Notify(msg) => {
            assert!(msg.contains("HTTP 400"));
            assert!(msg.contains("21211"));
        }
        other => panic!("expected notify error, got {:?}", other),
    }
}
