use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Offers whose decision deadline is closer than this are at risk until all
/// documents are in.
pub const AT_RISK_WINDOW_HOURS: i64 = 48;

/// Paperwork state of an offer package.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    Pending,
    AtRisk,
}

/// Compliant when every required document is received. Otherwise at risk
/// when the deadline is within the window or already passed, else pending.
pub fn compliance_status(
    documents_required: u32,
    documents_received: u32,
    decision_deadline: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> ComplianceStatus {
    if documents_received >= documents_required {
        return ComplianceStatus::Compliant;
    }

    match decision_deadline {
        Some(deadline) if deadline <= now + Duration::hours(AT_RISK_WINDOW_HOURS) => {
            ComplianceStatus::AtRisk
        }
        _ => ComplianceStatus::Pending,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_all_documents_received_is_compliant() {
        assert_eq!(
            compliance_status(2, 2, Some(now() - Duration::days(1)), now()),
            ComplianceStatus::Compliant
        );
        assert_eq!(compliance_status(0, 0, None, now()), ComplianceStatus::Compliant);
    }

    #[test]
    fn test_missing_documents_near_deadline_is_at_risk() {
        assert_eq!(
            compliance_status(3, 1, Some(now() + Duration::hours(36)), now()),
            ComplianceStatus::AtRisk
        );
        assert_eq!(
            compliance_status(3, 1, Some(now() - Duration::hours(1)), now()),
            ComplianceStatus::AtRisk
        );
    }

    #[test]
    fn test_missing_documents_far_from_deadline_is_pending() {
        assert_eq!(
            compliance_status(3, 1, Some(now() + Duration::days(5)), now()),
            ComplianceStatus::Pending
        );
        assert_eq!(compliance_status(3, 1, None, now()), ComplianceStatus::Pending);
    }
}
