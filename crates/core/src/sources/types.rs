use chrono::{DateTime, Utc};

use crate::subject::ValidationError;

/// Limit applied when a caller does not ask for one.
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Largest limit a subject-scoped list query may request.
pub const MAX_LIST_LIMIT: usize = 120;

/// Limit for parent-id batch queries.
pub const MAX_BATCH_LIMIT: usize = 1000;

/// An inclusive time range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    /// Creates a new range, validating that start <= end.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::InvalidTimeRange);
        }
        Ok(Self { start, end })
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start <= at && at <= self.end
    }
}

/// Filters shared by every list query.
///
/// `range` applies to the record's `createdAt`. An empty `statuses` list
/// matches every status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilters {
    pub range: Option<TimeRange>,
    pub statuses: Vec<&'static str>,
    pub limit: usize,
}

impl Default for ListFilters {
    fn default() -> Self {
        Self {
            range: None,
            statuses: Vec::new(),
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListFilters {
    /// Filters for a parent-id batch query.
    pub fn batch() -> Self {
        Self {
            limit: MAX_BATCH_LIMIT,
            ..Self::default()
        }
    }

    /// Sets the limit, clamped to `1..=MAX_LIST_LIMIT`.
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.clamp(1, MAX_LIST_LIMIT);
        self
    }

    pub fn with_range(mut self, range: TimeRange) -> Self {
        self.range = Some(range);
        self
    }

    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = &'static str>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    pub fn matches_status(&self, status: &str) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&status)
    }

    pub fn matches_time(&self, created_at: DateTime<Utc>) -> bool {
        self.range.is_none_or(|range| range.contains(created_at))
    }
}
