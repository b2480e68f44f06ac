use thiserror::Error;

/// Errors raised by a data source adapter.
///
/// `Clone` so that one failed build can hand the same error to every caller
/// waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Timed out: {0}")]
    Timeout(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for data source operations.
pub type Result<T> = std::result::Result<T, DataSourceError>;
