//! Error types for the API cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache engine and request orchestration.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key is not present in the namespace
    #[error("Key is not cached: {0}")]
    NotCached(String),

    /// Key is present but its TTL has elapsed
    #[error("Value referenced by '{0}' key is expired")]
    Expired(String),

    /// A deletion failed while cleaning expired entries
    #[error("Fail to clean the cache. Fail to '{0}' key")]
    CleanFailure(String),

    /// Invalid construction parameters or request descriptor
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Storage backend failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Value could not be converted to or from its stored form
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure in a persistent backend
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

// == Result Type Alias ==
/// Convenience Result type for the API cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_key() {
        assert_eq!(
            CacheError::Expired("get_users_".to_string()).to_string(),
            "Value referenced by 'get_users_' key is expired"
        );
        assert!(CacheError::CleanFailure("k1".to_string())
            .to_string()
            .contains("'k1'"));
    }

    #[test]
    fn test_json_error_converts() {
        let err = serde_json::from_str::<u32>("not json").unwrap_err();
        let converted: CacheError = err.into();
        assert!(matches!(converted, CacheError::Serialization(_)));
    }
}
