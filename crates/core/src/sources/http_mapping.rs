//! Pure mapping from data source errors to HTTP status codes.

use super::DataSourceError;

/// Maps a [`DataSourceError`] to an HTTP status code.
///
/// - `ConnectionFailed` -> 503 (Service Unavailable)
/// - `Timeout` -> 504 (Gateway Timeout)
/// - everything else -> 500 (Internal Server Error)
///
/// A missing record is a server error here: adapters only report `NotFound`
/// for records the build required, never for an empty result.
///
/// # Examples
///
/// ```
/// use gigdash_core::sources::{DataSourceError, data_source_error_to_status_code};
///
/// let error = DataSourceError::Timeout("stage fetch".to_string());
/// assert_eq!(data_source_error_to_status_code(&error), 504);
/// ```
pub fn data_source_error_to_status_code(error: &DataSourceError) -> u16 {
    match error {
        DataSourceError::ConnectionFailed(_) => 503,
        DataSourceError::Timeout(_) => 504,
        DataSourceError::NotFound { .. }
        | DataSourceError::QueryFailed(_)
        | DataSourceError::Serialization(_)
        | DataSourceError::InvalidData(_) => 500,
    }
}
