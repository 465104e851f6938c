use crate::app::ports::{NotifierPort, SendReceipt};
use crate::common::error::Result;
use crate::common::types::NotificationPayload;
use async_trait::async_trait;
use tracing::info;

/// Logs the message it would have sent instead of sending it.
pub struct DryRunNotifier;

#[async_trait]
impl NotifierPort for DryRunNotifier {
    async fn send(&self, payload: &NotificationPayload) -> Result<SendReceipt> {
        info!(to = %payload.to, from = %payload.from, body = %payload.body, "Dry run, not sending SMS");
        Ok(SendReceipt {
            message_id: "dry-run".to_string(),
            status: "skipped".to_string(),
            raw: serde_json::json!({ "to": payload.to, "from": payload.from, "body": payload.body }).to_string(),
        })
    }
}
