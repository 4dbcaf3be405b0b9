//! Configuration loader
//!
//! This module provides the ConfigLoader which is responsible for loading
//! configuration from .env files and environment variables.

use std::path::Path;

use super::dto::{
    BUFFER_CAPACITY_VAR, BlobLogConfig, CONNECTION_STRING_VAR, CONSOLE_LEVEL_VAR, CONTAINER_VAR,
    DEFAULT_BUFFER_CAPACITY, DEFAULT_CONTAINER, DEFAULT_OBJECT_PREFIX, LEVEL_VAR,
    OBJECT_PREFIX_VAR,
};
use super::error::{ConfigError, Result};
use super::validator::validate_blob_log_config;
use crate::levels::LogLevel;

/// Configuration loader
///
/// This loader handles loading configuration from:
/// 1. .env file (optional)
/// 2. Environment variables
///
/// # Priority
///
/// Variables already present in the process environment win over the
/// ones declared in the .env file.
///
/// # Example
///
/// ```ignore
/// use blob_log_shared::config::ConfigLoader;
/// use std::path::PathBuf;
///
/// let loader = ConfigLoader::new(Some(PathBuf::from(".env")));
/// let config = loader.load_blob_log_config()?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    /// Optional path to .env file
    env_file_path: Option<std::path::PathBuf>,
}

impl ConfigLoader {
    /// Create a new ConfigLoader
    ///
    /// # Example
    ///
    /// ```
    /// use blob_log_shared::config::ConfigLoader;
    ///
    /// // Without .env file
    /// let loader = ConfigLoader::new(None);
    ///
    /// // With .env file
    /// let loader = ConfigLoader::new(Some(".env".into()));
    /// ```
    pub fn new(env_file_path: Option<std::path::PathBuf>) -> Self {
        Self { env_file_path }
    }

    /// Load the blob logger configuration
    ///
    /// # Returns
    ///
    /// `Ok(BlobLogConfig)` if every present value parses and validates,
    /// `Err(ConfigError)` otherwise. A missing connection string is not an
    /// error here.
    pub fn load_blob_log_config(&self) -> Result<BlobLogConfig> {
        if let Some(path) = &self.env_file_path {
            self.load_env_file(path)?;
        }

        let config = BlobLogConfig::from_env()?;
        validate_blob_log_config(&config)?;

        Ok(config)
    }

    fn load_env_file(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(ConfigError::EnvFileLoad {
                path: path.to_path_buf(),
                source: dotenv::Error::Io(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path.display()),
                )),
            });
        }

        dotenv::from_path(path).map_err(|e| ConfigError::EnvFileLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }
}

impl Default for ConfigLoader {
    /// Create a ConfigLoader without .env file support
    fn default() -> Self {
        Self::new(None)
    }
}

// ============================================================================
// Implementation: BlobLogConfig::from_env
// ============================================================================

impl BlobLogConfig {
    /// Build the configuration from environment variables
    ///
    /// # Optional Environment Variables
    ///
    /// - `AZURE_STORAGE_CONNECTION_STRING`: storage credential (no default)
    /// - `BLOB_LOG_CONTAINER`: container for log objects (default: "logs")
    /// - `BLOB_LOG_BUFFER_CAPACITY`: lines buffered before a flush (default: 10)
    /// - `BLOB_LOG_OBJECT_PREFIX`: object name prefix (default: "sec_filing")
    /// - `BLOB_LOG_LEVEL`: logger level (default: "INFO")
    /// - `BLOB_LOG_CONSOLE_LEVEL`: console echo level (default: "WARNING")
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let connection_string = lookup(CONNECTION_STRING_VAR)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let container = lookup(CONTAINER_VAR).unwrap_or_else(|| DEFAULT_CONTAINER.to_string());
        let buffer_capacity =
            parse_optional_var(&lookup, BUFFER_CAPACITY_VAR, DEFAULT_BUFFER_CAPACITY)?;
        let object_prefix =
            lookup(OBJECT_PREFIX_VAR).unwrap_or_else(|| DEFAULT_OBJECT_PREFIX.to_string());
        let level = parse_optional_var(&lookup, LEVEL_VAR, LogLevel::Info)?;
        let console_level = parse_optional_var(&lookup, CONSOLE_LEVEL_VAR, LogLevel::Warning)?;

        Ok(Self {
            connection_string,
            container,
            buffer_capacity,
            object_prefix,
            level,
            console_level,
        })
    }

    /// Connection string, or the configuration error raised when it is absent
    pub fn require_connection_string(&self) -> Result<&str> {
        self.connection_string
            .as_deref()
            .ok_or_else(|| ConfigError::MissingRequired {
                var: CONNECTION_STRING_VAR.to_string(),
            })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Parse optional variable with default value; a present but malformed
/// value is an error
fn parse_optional_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            value: raw,
        }),
    }
}

// ============================================================================
// Tests
// ============================================================================
