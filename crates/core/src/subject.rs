use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised before any data source is touched.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid subject id {0:?}: expected a positive integer")]
    InvalidSubjectId(String),
    #[error("Invalid time range: start must be before or equal to end")]
    InvalidTimeRange,
    #[error("Unknown cache namespace: {0}")]
    UnknownNamespace(String),
}

/// Identifier of the user a dashboard snapshot is built for.
///
/// Always positive. Construct it through [`SubjectId::new`] or
/// [`SubjectId::parse`]; there is no way to build an unvalidated one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct SubjectId(i64);

impl SubjectId {
    /// Validates a numeric identifier.
    pub fn new(raw: i64) -> Result<Self, ValidationError> {
        if raw > 0 {
            Ok(Self(raw))
        } else {
            Err(ValidationError::InvalidSubjectId(raw.to_string()))
        }
    }

    /// Normalizes and validates a textual identifier (e.g. a path segment).
    ///
    /// Surrounding whitespace is ignored; anything that is not a positive
    /// base-10 integer is rejected.
    ///
    /// ```
    /// use gigdash_core::subject::SubjectId;
    ///
    /// assert_eq!(SubjectId::parse(" 42 ").unwrap().get(), 42);
    /// assert!(SubjectId::parse("0").is_err());
    /// assert!(SubjectId::parse("4.2").is_err());
    /// ```
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        raw.trim()
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .map(Self)
            .ok_or_else(|| ValidationError::InvalidSubjectId(raw.to_string()))
    }

    /// Returns the raw identifier.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SubjectId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<i64> for SubjectId {
    type Error = ValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<SubjectId> for i64 {
    fn from(value: SubjectId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_positive_integers() {
        assert_eq!(SubjectId::parse("1").unwrap().get(), 1);
        assert_eq!(SubjectId::parse("007").unwrap().get(), 7);
        assert_eq!(SubjectId::parse("  15\n").unwrap().get(), 15);
    }

    #[test]
    fn test_parse_rejects_non_positive_and_garbage() {
        for raw in ["0", "-3", "", "abc", "1.5", "12abc", "99999999999999999999"] {
            assert_eq!(
                SubjectId::parse(raw),
                Err(ValidationError::InvalidSubjectId(raw.to_string())),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_new_rejects_zero_and_negative() {
        assert!(SubjectId::new(0).is_err());
        assert!(SubjectId::new(-1).is_err());
        assert_eq!(SubjectId::new(5).unwrap().to_string(), "5");
    }

    #[test]
    fn test_serde_round_trips_as_number() {
        let id = SubjectId::new(9).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "9");
        assert!(serde_json::from_str::<SubjectId>("-2").is_err());
    }

    #[test]
    fn test_validation_error_display() {
        let error = ValidationError::InvalidSubjectId("abc".to_string());
        assert_eq!(
            error.to_string(),
            "Invalid subject id \"abc\": expected a positive integer"
        );
        assert_eq!(
            ValidationError::InvalidTimeRange.to_string(),
            "Invalid time range: start must be before or equal to end"
        );
    }
}
