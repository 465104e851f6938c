use serde::{Deserialize, Serialize};
use std::fmt;

/// One candidate's certification state as returned by the registry.
///
/// Only `name`, `certification_status` and `certification_message` drive any
/// behaviour. A few of the remaining fields (PA status, product, current flag) are
/// logged with every "not yet" check; the rest pass through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationRecord {
    #[serde(rename = "Name", deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "CertificationStatus", deserialize_with = "null_as_default")]
    pub certification_status: String,
    #[serde(rename = "CertificationMessage", deserialize_with = "null_as_default")]
    pub certification_message: String,
    #[serde(rename = "CertificationMessageWeb", deserialize_with = "null_as_default")]
    pub certification_message_web: String,
    #[serde(rename = "CityState", deserialize_with = "null_as_default")]
    pub city_state: String,
    #[serde(rename = "AllowCredentialRequest", deserialize_with = "null_as_default")]
    pub allow_credential_request: bool,
    #[serde(rename = "IsPANCEApplicant", deserialize_with = "null_as_default")]
    pub is_pance_applicant: bool,
    #[serde(rename = "HasReportableDisciplinaryAction", deserialize_with = "null_as_default")]
    pub has_reportable_disciplinary_action: bool,
    #[serde(rename = "PaId", deserialize_with = "null_as_default")]
    pub pa_id: i64,
    #[serde(rename = "CertificationProduct", deserialize_with = "null_as_default")]
    pub certification_product: i64,
    #[serde(rename = "CertificationProductName", deserialize_with = "null_as_default")]
    pub certification_product_name: String,
    #[serde(rename = "PaStatus", deserialize_with = "null_as_default")]
    pub pa_status: i64,
    #[serde(rename = "PaStatusName", deserialize_with = "null_as_default")]
    pub pa_status_name: String,
    #[serde(rename = "CAQStatus", deserialize_with = "null_as_default")]
    pub caq_status: i64,
    #[serde(rename = "CAQStatusName", deserialize_with = "null_as_default")]
    pub caq_status_name: String,
    #[serde(rename = "GraduationDate", deserialize_with = "null_as_default")]
    pub graduation_date: String,
    #[serde(rename = "ExpectedGraduationDate", deserialize_with = "null_as_default")]
    pub expected_graduation_date: String,
    #[serde(rename = "IsSurgery", deserialize_with = "null_as_default")]
    pub is_surgery: bool,
    #[serde(rename = "IsSpecialty", deserialize_with = "null_as_default")]
    pub is_specialty: bool,
    #[serde(rename = "IsCurrent", deserialize_with = "null_as_default")]
    pub is_current: bool,
}

// The registry sends `null` for fields it has no value for.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Opaque registry access token, read once at startup.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<{} chars redacted>)", self.0.len())
    }
}

/// Request body for `SearchById`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ByIdParams {
    pub id: String,
    pub token: AccessToken,
}

/// Request body for `SearchByAttributes`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ByAttributesParams {
    pub first_name: String,
    pub last_name: String,
    pub country_code: String,
    pub state_code: String,
    pub token: AccessToken,
}

/// How the candidate is looked up. Exactly one variant is active per run.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupParams {
    ById(ByIdParams),
    ByAttributes(ByAttributesParams),
}

impl LookupParams {
    /// Human readable description of who we are looking for, never includes the token.
    pub fn describe(&self) -> String {
        match self {
            LookupParams::ById(p) => format!("ID: {}", p.id),
            LookupParams::ByAttributes(p) => format!(
                "{} {} ({}, {})",
                p.first_name, p.last_name, p.state_code, p.country_code
            ),
        }
    }
}

/// Result of comparing a record's status against "Certified".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertStatus {
    Certified,
    NotYet,
}

/// Outbound SMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPayload {
    pub to: String,
    pub from: String,
    pub body: String,
}
