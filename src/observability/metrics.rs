//! Check and notification counters, exported in Prometheus format when a
//! listener address is configured. Without one, recording is a no-op.

use std::fmt;
use std::net::SocketAddr;
use tracing::info;

/// All metric names used by the checker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    ChecksTotal,
    LookupDuration,
    NotificationsTotal,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::ChecksTotal => "nccpa_checks_total",
            MetricName::LookupDuration => "nccpa_lookup_duration_seconds",
            MetricName::NotificationsTotal => "nccpa_notifications_total",
        }
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Installs the Prometheus recorder and serves `/metrics` on `addr`.
/// Must be called from inside the tokio runtime.
pub fn init(addr: SocketAddr) -> Result<(), String> {
    metrics_exporter_prometheus::PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {}", e))?;
    info!(%addr, "Metrics exporter listening");
    Ok(())
}

pub mod checks {
    use super::MetricName;

    pub fn certified() {
        ::metrics::counter!(MetricName::ChecksTotal.as_str(), "outcome" => "certified").increment(1);
    }

    pub fn not_yet() {
        ::metrics::counter!(MetricName::ChecksTotal.as_str(), "outcome" => "not_yet").increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::ChecksTotal.as_str(), "outcome" => "error").increment(1);
    }

    pub fn lookup_duration(secs: f64) {
        ::metrics::histogram!(MetricName::LookupDuration.as_str()).record(secs);
    }
}

pub mod notifications {
    use super::MetricName;

    pub fn sent() {
        ::metrics::counter!(MetricName::NotificationsTotal.as_str(), "result" => "sent").increment(1);
    }

    pub fn failed() {
        ::metrics::counter!(MetricName::NotificationsTotal.as_str(), "result" => "failed").increment(1);
    }
}
