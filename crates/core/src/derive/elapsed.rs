use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Hours elapsed between `start` and `now`.
///
/// Returns `None` when there is no start. A start in the future yields `0.0`
/// rather than a negative duration.
pub fn elapsed_hours(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<f64> {
    let start = start?;
    let seconds = (now - start).num_seconds().max(0);
    Some(seconds as f64 / SECONDS_PER_HOUR)
}

/// Days elapsed between `start` and `now`, with the same rules as [`elapsed_hours`].
pub fn elapsed_days(start: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<f64> {
    elapsed_hours(start, now).map(|hours| hours / 24.0)
}

/// Signed hours from `now` until `at`. Negative once `at` has passed.
pub fn hours_until(at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> Option<f64> {
    let at = at?;
    Some((at - now).num_seconds() as f64 / SECONDS_PER_HOUR)
}

/// Parses a timestamp in any of the formats stores are known to produce.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` (both read
/// as UTC) and a bare `YYYY-MM-DD` (midnight UTC). Anything else, including an
/// empty string, is `None`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}
