use thiserror::Error;

use crate::sources::DataSourceError;

/// Errors surfaced by a snapshot cache.
///
/// A failed build is delivered, as a clone of the same value, to every caller
/// that was waiting on it.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("Snapshot build failed for {key}: {source}")]
    Build {
        key: String,
        #[source]
        source: DataSourceError,
    },
}

impl CacheError {
    /// The data source error behind this failure.
    pub fn data_source_error(&self) -> &DataSourceError {
        match self {
            CacheError::Build { source, .. } => source,
        }
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_error_display() {
        let error = CacheError::Build {
            key: "dashboard:user:7".to_string(),
            source: DataSourceError::ConnectionFailed("refused".to_string()),
        };
        assert_eq!(
            error.to_string(),
            "Snapshot build failed for dashboard:user:7: Connection failed: refused"
        );
        assert_eq!(
            error.data_source_error(),
            &DataSourceError::ConnectionFailed("refused".to_string())
        );
    }
}
