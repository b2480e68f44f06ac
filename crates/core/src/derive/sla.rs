use chrono::{DateTime, Duration, Utc};

/// True when `elapsed_hours` is strictly greater than the SLA.
///
/// A missing elapsed time or a missing SLA never counts as a breach.
pub fn is_sla_breached(elapsed_hours: Option<f64>, sla_hours: Option<u32>) -> bool {
    match (elapsed_hours, sla_hours) {
        (Some(elapsed), Some(sla)) => elapsed > f64::from(sla),
        _ => false,
    }
}

/// A record is overdue when its status already says so, or when it has sat
/// in its stage past the SLA. Either condition is sufficient.
pub fn is_overdue(flagged_overdue: bool, elapsed_hours: Option<f64>, sla_hours: Option<u32>) -> bool {
    flagged_overdue || is_sla_breached(elapsed_hours, sla_hours)
}

/// The instant at which a record entering a stage at `entered_at` breaches it.
pub fn sla_deadline(entered_at: Option<DateTime<Utc>>, sla_hours: Option<u32>) -> Option<DateTime<Utc>> {
    Some(entered_at? + Duration::hours(i64::from(sla_hours?)))
}

/// True once `due_at` lies strictly before `now`.
pub fn is_past_due(due_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    due_at.is_some_and(|due| due < now)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::derive::elapsed_hours;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_sla_breach_after_threshold() {
        let entered = now() - Duration::hours(30);
        let elapsed = elapsed_hours(Some(entered), now());

        assert!(is_sla_breached(elapsed, Some(24)));
        assert!(is_overdue(false, elapsed, Some(24)));
    }

    #[test]
    fn test_no_breach_within_threshold() {
        let entered = now() - Duration::hours(23);
        let elapsed = elapsed_hours(Some(entered), now());

        assert!(!is_sla_breached(elapsed, Some(24)));
        assert!(!is_overdue(false, elapsed, Some(24)));
    }

    #[test]
    fn test_exactly_at_threshold_is_not_breached() {
        assert!(!is_sla_breached(Some(24.0), Some(24)));
    }

    #[test]
    fn test_status_flag_alone_is_overdue() {
        assert!(is_overdue(true, Some(1.0), Some(24)));
        assert!(is_overdue(true, None, None));
    }

    #[test]
    fn test_missing_inputs_never_breach() {
        assert!(!is_sla_breached(None, Some(24)));
        assert!(!is_sla_breached(Some(500.0), None));
    }

    #[test]
    fn test_sla_deadline() {
        let entered = now() - Duration::hours(10);
        assert_eq!(
            sla_deadline(Some(entered), Some(24)),
            Some(now() + Duration::hours(14))
        );
        assert_eq!(sla_deadline(None, Some(24)), None);
        assert_eq!(sla_deadline(Some(entered), None), None);
    }

    #[test]
    fn test_past_due() {
        assert!(is_past_due(Some(now() - Duration::seconds(1)), now()));
        assert!(!is_past_due(Some(now()), now()));
        assert!(!is_past_due(None, now()));
    }
}
