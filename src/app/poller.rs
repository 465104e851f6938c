use crate::app::evaluator::evaluate;
use crate::app::notifier::{Notifier, NotifyOutcome};
use crate::app::ports::RegistryPort;
use crate::common::error::Result;
use crate::common::types::{CertStatus, CertificationRecord, LookupParams};
use crate::observability::metrics;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};

/// Result of a single lookup + evaluate pass.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    Certified {
        record: CertificationRecord,
        notification: NotifyOutcome,
    },
    NotYet {
        record: CertificationRecord,
    },
}

impl CheckOutcome {
    pub fn is_certified(&self) -> bool {
        matches!(self, CheckOutcome::Certified { .. })
    }

    pub fn record(&self) -> &CertificationRecord {
        match self {
            CheckOutcome::Certified { record, .. } | CheckOutcome::NotYet { record } => record,
        }
    }
}

/// Looks the candidate up, decides whether they are certified and notifies if so.
pub struct StatusPoller {
    registry: Arc<dyn RegistryPort>,
    notifier: Notifier,
    params: LookupParams,
}

impl StatusPoller {
    pub fn new(registry: Arc<dyn RegistryPort>, notifier: Notifier, params: LookupParams) -> Self {
        Self { registry, notifier, params }
    }

    pub fn params(&self) -> &LookupParams {
        &self.params
    }

    /// Runs one check. Lookup errors are returned untouched for the caller to classify.
    #[instrument(skip(self), fields(candidate = %self.params.describe()))]
    pub async fn check(&self) -> Result<CheckOutcome> {
        let started = Instant::now();
        let lookup = self.registry.lookup(&self.params).await;
        metrics::checks::lookup_duration(started.elapsed().as_secs_f64());

        let record = match lookup {
            Ok(record) => record,
            Err(e) => {
                metrics::checks::failed();
                return Err(e);
            }
        };

        match evaluate(&record) {
            CertStatus::Certified => {
                metrics::checks::certified();
                info!("YESSSS!!!! Certified! : {}", record.certification_message);
                let notification = self.notifier.notify(&record.certification_message).await;
                Ok(CheckOutcome::Certified { record, notification })
            }
            CertStatus::NotYet => {
                metrics::checks::not_yet();
                info!(
                    status = %record.certification_status,
                    pa_status = %record.pa_status_name,
                    product = %record.certification_product_name,
                    is_current = record.is_current,
                    "Not yet : {}",
                    record.certification_message
                );
                Ok(CheckOutcome::NotYet { record })
            }
        }
    }
}
