use crate::app::ports::{NotifierPort, SendReceipt};
use crate::common::types::NotificationPayload;
use crate::observability::metrics;
use std::sync::Arc;
use tracing::{error, info};

/// Outcome of a notification attempt. Failures are reported, never raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    Delivered(SendReceipt),
    Failed(String),
}

/// Sends the certification message from the configured number to the configured number.
pub struct Notifier {
    port: Arc<dyn NotifierPort>,
    from: String,
    to: String,
}

impl Notifier {
    pub fn new(port: Arc<dyn NotifierPort>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self { port, from: from.into(), to: to.into() }
    }

    /// Sends `message` and logs the provider response.
    ///
    /// A failed send is logged and swallowed: once the candidate is certified the
    /// process still exits successfully, so a delivery failure is only visible in
    /// the logs.
    pub async fn notify(&self, message: &str) -> NotifyOutcome {
        let payload = NotificationPayload {
            to: self.to.clone(),
            from: self.from.clone(),
            body: message.to_string(),
        };

        match self.port.send(&payload).await {
            Ok(receipt) => {
                metrics::notifications::sent();
                info!(
                    message_id = %receipt.message_id,
                    status = %receipt.status,
                    "Message sent : {}",
                    receipt.raw
                );
                NotifyOutcome::Delivered(receipt)
            }
            Err(e) => {
                metrics::notifications::failed();
                error!("Unable to send message : {}", e);
                NotifyOutcome::Failed(e.to_string())
            }
        }
    }
}
