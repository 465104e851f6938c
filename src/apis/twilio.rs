use crate::app::ports::{NotifierPort, SendReceipt};
use crate::common::error::{CheckerError, Result};
use crate::common::types::NotificationPayload;
use async_trait::async_trait;
use serde::Deserialize;
use std::fmt;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
}

impl fmt::Debug for TwilioCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TwilioCredentials")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .finish()
    }
}

/// Message resource returned by `POST /Messages.json`.
#[derive(Debug, Deserialize)]
struct MessageResource {
    sid: Option<String>,
    status: Option<String>,
}

/// Error document Twilio returns with 4xx/5xx answers.
#[derive(Debug, Deserialize)]
struct TwilioErrorBody {
    code: Option<i64>,
    message: Option<String>,
}

/// Sends SMS through the Twilio Programmable Messaging REST API.
pub struct TwilioClient {
    client: reqwest::Client,
    api_base: String,
    credentials: TwilioCredentials,
}

impl TwilioClient {
    pub fn with_api_base(
        client: reqwest::Client,
        credentials: TwilioCredentials,
        api_base: impl Into<String>,
    ) -> Self {
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
        }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.api_base, self.credentials.account_sid
        )
    }
}

#[async_trait]
impl NotifierPort for TwilioClient {
    #[instrument(skip_all, fields(to = %payload.to))]
    async fn send(&self, payload: &NotificationPayload) -> Result<SendReceipt> {
        let url = self.messages_url();
        debug!(%url, "Creating Twilio message");

        let response = self
            .client
            .post(&url)
            .basic_auth(&self.credentials.account_sid, Some(&self.credentials.auth_token))
            .form(&[
                ("To", payload.to.as_str()),
                ("From", payload.from.as_str()),
                ("Body", payload.body.as_str()),
            ])
            .send()
            .await?;

        let status = response.status();
        let raw = response.text().await?;

        if !status.is_success() {
            let detail = match serde_json::from_str::<TwilioErrorBody>(&raw) {
                Ok(TwilioErrorBody { code, message: Some(message) }) => match code {
                    Some(code) => format!("{} (code {})", message, code),
                    None => message,
                },
                _ => raw.clone(),
            };
            return Err(CheckerError::Notify(format!("HTTP {}: {}", status.as_u16(), detail)));
        }

        let message: MessageResource = serde_json::from_str(&raw)?;
        Ok(SendReceipt {
            message_id: message.sid.unwrap_or_default(),
            status: message.status.unwrap_or_default(),
            raw,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_url_is_scoped_to_account() {
        let client = TwilioClient::with_api_base(
            reqwest::Client::new(),
            TwilioCredentials { account_sid: "AC123".into(), auth_token: "tok".into() },
            "http://127.0.0.1:9/",
        );
        assert_eq!(client.messages_url(), "http://127.0.0.1:9/2010-04-01/Accounts/AC123/Messages.json");
    }

    #[test]
    fn credentials_debug_hides_auth_token() {
        let creds = TwilioCredentials { account_sid: "AC123".into(), auth_token: "hunter2".into() };
        let debug = format!("{:?}", creds);
        assert!(debug.contains("AC123"));
        assert!(!debug.contains("hunter2"));
    }
}
