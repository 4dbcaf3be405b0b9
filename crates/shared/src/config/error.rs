//! Configuration error types
//!
//! This module defines all error types that can occur during configuration loading and validation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading or validation
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A required configuration variable is missing
    #[error("Missing required configuration: {var}")]
    MissingRequired { var: String },

    /// A configuration variable has an invalid value
    #[error("Invalid value for {var}: {value}")]
    InvalidValue { var: String, value: String },

    /// Failed to load .env file
    #[error("Failed to load .env file from {path}: {source}")]
    EnvFileLoad {
        path: PathBuf,
        #[source]
        source: dotenv::Error,
    },

    /// Configuration validation failed
    #[error("Configuration validation failed: {0}")]
    Validation(String),

    /// The storage connection string could not be understood
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_required_display() {
        let err = ConfigError::MissingRequired {
            var: "AZURE_STORAGE_CONNECTION_STRING".to_string(),
        };
        assert!(err.to_string().contains("AZURE_STORAGE_CONNECTION_STRING"));
        assert!(err.to_string().contains("Missing required"));
    }

    #[test]
    fn test_invalid_value_display() {
        let err = ConfigError::InvalidValue {
            var: "BLOB_LOG_BUFFER_CAPACITY".to_string(),
            value: "abc".to_string(),
        };
        assert!(err.to_string().contains("BLOB_LOG_BUFFER_CAPACITY"));
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn test_connection_string_display() {
        let err = ConfigError::InvalidConnectionString("missing AccountKey".to_string());
        assert!(err.to_string().contains("missing AccountKey"));
    }
}
