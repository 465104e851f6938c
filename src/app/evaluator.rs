use crate::common::constants::CERTIFIED_STATUS;
use crate::common::types::{CertStatus, CertificationRecord};

/// Exact, case-sensitive match against "Certified". Everything else is "not yet".
pub fn evaluate(record: &CertificationRecord) -> CertStatus {
    if record.certification_status == CERTIFIED_STATUS {
        CertStatus::Certified
    } else {
        CertStatus::NotYet
    }
}
