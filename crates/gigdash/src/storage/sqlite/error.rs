//! SQLite error mapping.
//!
//! Maps `tokio_rusqlite::Error` and `rusqlite::Error` to `DataSourceError`
//! from `gigdash_core::sources`.

use gigdash_core::sources::DataSourceError;

/// Maps a rusqlite error to a DataSourceError.
///
/// # Error Mapping
///
/// - Cannot open / busy / locked database → `DataSourceError::ConnectionFailed`
/// - Row conversion failures → `DataSourceError::InvalidData`
/// - All other errors → `DataSourceError::QueryFailed`
fn map_rusqlite_error(err: &rusqlite::Error, entity_type: &'static str) -> DataSourceError {
    match err {
        rusqlite::Error::SqliteFailure(sqlite_err, _)
            if matches!(
                sqlite_err.code,
                rusqlite::ErrorCode::CannotOpen
                    | rusqlite::ErrorCode::DatabaseBusy
                    | rusqlite::ErrorCode::DatabaseLocked
            ) =>
        {
            DataSourceError::ConnectionFailed(format!("{entity_type}: {err}"))
        }

        rusqlite::Error::FromSqlConversionFailure(..)
        | rusqlite::Error::InvalidColumnType(..)
        | rusqlite::Error::IntegralValueOutOfRange(..) => {
            DataSourceError::InvalidData(format!("{entity_type}: {err}"))
        }

        _ => DataSourceError::QueryFailed(format!("{entity_type}: {err}")),
    }
}

/// Maps a tokio_rusqlite error to a DataSourceError.
///
/// This is the main entry point for error mapping in async code.
pub fn map_tokio_rusqlite_error(
    err: tokio_rusqlite::Error,
    entity_type: &'static str,
) -> DataSourceError {
    match &err {
        tokio_rusqlite::Error::Rusqlite(rusqlite_err) => {
            map_rusqlite_error(rusqlite_err, entity_type)
        }
        tokio_rusqlite::Error::ConnectionClosed | tokio_rusqlite::Error::Close(_) => {
            DataSourceError::ConnectionFailed("Connection closed unexpectedly".to_string())
        }
        _ => DataSourceError::QueryFailed(err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::ffi;

    #[test]
    fn test_cannot_open_maps_to_connection_failed() {
        let sqlite_err = ffi::Error {
            code: rusqlite::ErrorCode::CannotOpen,
            extended_code: ffi::SQLITE_CANTOPEN,
        };
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(sqlite_err, None));

        let result = map_tokio_rusqlite_error(err, "Order");

        assert!(matches!(result, DataSourceError::ConnectionFailed(_)));
    }

    #[test]
    fn test_conversion_failure_maps_to_invalid_data() {
        let rusqlite_err = rusqlite::Error::FromSqlConversionFailure(
            4,
            rusqlite::types::Type::Text,
            Box::new(std::io::Error::other("Unknown status: finished")),
        );
        let err = tokio_rusqlite::Error::Rusqlite(rusqlite_err);

        let result = map_tokio_rusqlite_error(err, "InterviewTask");

        assert!(matches!(result, DataSourceError::InvalidData(message) if message.starts_with("InterviewTask")));
    }

    #[test]
    fn test_connection_closed_maps_to_connection_failed() {
        let result = map_tokio_rusqlite_error(tokio_rusqlite::Error::ConnectionClosed, "User");

        assert!(matches!(result, DataSourceError::ConnectionFailed(_)));
    }

    #[test]
    fn test_other_error_maps_to_query_failed() {
        let err = tokio_rusqlite::Error::Other(Box::new(std::io::Error::other("test error")));

        let result = map_tokio_rusqlite_error(err, "User");

        assert!(matches!(result, DataSourceError::QueryFailed(_)));
    }
}
