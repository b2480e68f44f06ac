use thiserror::Error;

use crate::cache::CacheError;
use crate::sources::{data_source_error_to_status_code, DataSourceError};
use crate::subject::ValidationError;

/// Errors returned by the dashboard facade.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DashboardError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    DataSource(#[from] DataSourceError),
    #[error(transparent)]
    Cache(#[from] CacheError),
}

/// Maps a [`DashboardError`] to an HTTP status code.
///
/// Validation failures are client errors (400). Build failures take the
/// status of the data source error behind them.
///
/// ```
/// use gigdash_core::snapshot::{dashboard_error_to_status_code, DashboardError};
/// use gigdash_core::subject::ValidationError;
///
/// let error = DashboardError::from(ValidationError::InvalidSubjectId("x".into()));
/// assert_eq!(dashboard_error_to_status_code(&error), 400);
/// ```
pub fn dashboard_error_to_status_code(error: &DashboardError) -> u16 {
    match error {
        DashboardError::Validation(_) => 400,
        DashboardError::DataSource(source) => data_source_error_to_status_code(source),
        DashboardError::Cache(cache) => data_source_error_to_status_code(cache.data_source_error()),
    }
}
