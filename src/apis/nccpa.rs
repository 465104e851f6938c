use crate::app::ports::RegistryPort;
use crate::common::constants::{SEARCH_BY_ATTRIBUTES_PATH, SEARCH_BY_ID_PATH};
use crate::common::error::{CheckerError, Result};
use crate::common::types::{ByAttributesParams, ByIdParams, CertificationRecord, LookupParams};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, instrument, warn};

// Error bodies are echoed into logs, keep them short.
const MAX_ERROR_BODY_CHARS: usize = 512;

/// Client for the NCCPA "verify PA-C" lookup endpoints.
pub struct NccpaRegistry {
    client: reqwest::Client,
    base_url: String,
}

impl NccpaRegistry {
    pub fn with_base_url(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    #[instrument(skip_all, fields(id = %params.id))]
    pub async fn lookup_by_id(&self, params: &ByIdParams) -> Result<CertificationRecord> {
        let record: Option<CertificationRecord> = self.post_json(SEARCH_BY_ID_PATH, params).await?;
        require_named(record.unwrap_or_default(), &params.id)
    }

    #[instrument(skip_all, fields(first_name = %params.first_name, last_name = %params.last_name))]
    pub async fn lookup_by_attributes(&self, params: &ByAttributesParams) -> Result<CertificationRecord> {
        let records: Option<Vec<CertificationRecord>> =
            self.post_json(SEARCH_BY_ATTRIBUTES_PATH, params).await?;
        let query = format!(
            "parameters: {} {} ({}, {})",
            params.first_name, params.last_name, params.state_code, params.country_code
        );
        select_single(records.unwrap_or_default(), &query)
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "Posting registry lookup");

        let response = self.client.post(&url).json(body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CheckerError::RegistryStatus {
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl RegistryPort for NccpaRegistry {
    async fn lookup(&self, params: &LookupParams) -> Result<CertificationRecord> {
        match params {
            LookupParams::ById(p) => self.lookup_by_id(p).await,
            LookupParams::ByAttributes(p) => self.lookup_by_attributes(p).await,
        }
    }
}

/// An ID lookup for an unknown candidate comes back as a record with no name.
pub fn require_named(record: CertificationRecord, id: &str) -> Result<CertificationRecord> {
    if record.name.is_empty() {
        return Err(CheckerError::NotFound { query: format!("ID : {}", id) });
    }
    Ok(record)
}

/// Attribute lookups must match exactly one candidate. More than one is refused
/// rather than reporting on somebody else's certification.
pub fn select_single(mut records: Vec<CertificationRecord>, query: &str) -> Result<CertificationRecord> {
    match records.len() {
        0 => Err(CheckerError::NotFound { query: query.to_string() }),
        1 => Ok(records.remove(0)),
        count => {
            let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
            warn!(count, ?names, "There were multiple certifications found!");
            Err(CheckerError::AmbiguousMatch { count, query: query.to_string() })
        }
    }
}
