//! Error types for the cache layer and the config loader
//!
//! Provides unified error handling using thiserror.

use std::path::PathBuf;

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised by the persistent store and the memoizing wrapper.
///
/// A clean cache miss is never an error: lookups return `Ok(None)`.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The backing store could not be opened or reached
    #[error("Cache store unavailable: {0}")]
    StoreUnavailable(String),

    /// A query against an open store failed
    #[error("Cache store error: {0}")]
    Store(#[from] sqlx::Error),

    /// A value or call argument could not be encoded or decoded
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The wrapper was built with an unusable configuration
    #[error("Invalid cache configuration: {0}")]
    InvalidConfig(String),
}

// == Config Error Enum ==
/// Errors raised while discovering, reading or writing config files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Could not determine the home directory")]
    HomeNotFound,

    #[error("Config in {0} is not an object")]
    NotAnObject(PathBuf),
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_unavailable_message() {
        let err = CacheError::StoreUnavailable("database is locked".to_string());
        assert_eq!(err.to_string(), "Cache store unavailable: database is locked");
    }

    #[test]
    fn test_serialization_error_from_serde() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: CacheError = source.into();
        assert!(matches!(err, CacheError::Serialization(_)));
    }

    #[test]
    fn test_config_error_names_path() {
        let err = ConfigError::NotAnObject(PathBuf::from("/tmp/.memocacherc"));
        assert!(err.to_string().contains("/tmp/.memocacherc"));
    }
}
