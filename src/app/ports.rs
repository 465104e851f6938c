use crate::common::error::Result;
use crate::common::types::{CertificationRecord, LookupParams, NotificationPayload};
use async_trait::async_trait;

/// Remote certification lookup.
#[async_trait]
pub trait RegistryPort: Send + Sync {
    async fn lookup(&self, params: &LookupParams) -> Result<CertificationRecord>;
}

/// What the SMS provider told us about a message it accepted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SendReceipt {
    pub message_id: String,
    pub status: String,
    /// Raw provider response, logged verbatim.
    pub raw: String,
}

/// One-way SMS delivery.
#[async_trait]
pub trait NotifierPort: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<SendReceipt>;
}
