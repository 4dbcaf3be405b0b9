//! Configuration Data Transfer Objects (DTOs)
//!
//! Immutable configuration for the blob logger. Loaded once by the
//! composition root and handed to the logger provider.

use serde::{Deserialize, Serialize};

use crate::levels::LogLevel;

/// Environment variable holding the storage connection string
pub const CONNECTION_STRING_VAR: &str = "AZURE_STORAGE_CONNECTION_STRING";
pub const CONTAINER_VAR: &str = "BLOB_LOG_CONTAINER";
pub const BUFFER_CAPACITY_VAR: &str = "BLOB_LOG_BUFFER_CAPACITY";
pub const OBJECT_PREFIX_VAR: &str = "BLOB_LOG_OBJECT_PREFIX";
pub const LEVEL_VAR: &str = "BLOB_LOG_LEVEL";
pub const CONSOLE_LEVEL_VAR: &str = "BLOB_LOG_CONSOLE_LEVEL";

pub const DEFAULT_CONTAINER: &str = "logs";
pub const DEFAULT_BUFFER_CAPACITY: usize = 10;
pub const DEFAULT_OBJECT_PREFIX: &str = "sec_filing";

/// Configuration DTO for the buffered remote logger
///
/// # Example
///
/// ```ignore
/// use blob_log_shared::config::BlobLogConfig;
///
/// let config = BlobLogConfig::from_env()?;
/// println!("Logs go to container: {}", config.container);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlobLogConfig {
    /// Storage connection string. Absence is only fatal when the logger
    /// is initialized, so loading never fails on it.
    #[serde(skip_serializing)]
    pub connection_string: Option<String>,

    /// Default container for log objects
    pub container: String,

    /// Number of buffered lines that triggers a flush
    pub buffer_capacity: usize,

    /// Prefix of the timestamped object name
    pub object_prefix: String,

    /// Minimum level accepted by the logger
    pub level: LogLevel,

    /// Minimum level echoed to the console
    pub console_level: LogLevel,
}

impl Default for BlobLogConfig {
    fn default() -> Self {
        Self {
            connection_string: None,
            container: DEFAULT_CONTAINER.to_string(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            object_prefix: DEFAULT_OBJECT_PREFIX.to_string(),
            level: LogLevel::Info,
            console_level: LogLevel::Warning,
        }
    }
}

impl BlobLogConfig {
    /// Same configuration with a credential attached
    pub fn with_connection_string(mut self, connection_string: impl Into<String>) -> Self {
        self.connection_string = Some(connection_string.into());
        self
    }

    /// Same configuration targeting another container
    pub fn with_container(mut self, container: impl Into<String>) -> Self {
        self.container = container.into();
        self
    }

    /// Same configuration with another flush threshold
    pub fn with_buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }
}
