// Shared Kernel - base types and the error taxonomy shared by every layer

pub use blob_log_shared::*;

use crate::storage::{BlobLocation, StorageError};

/// Errors surfaced by the logger to its callers
#[derive(thiserror::Error, Debug)]
pub enum LoggerError {
    /// Required configuration missing or invalid; fatal, never retried
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigError),

    /// Read-before-flush or overwrite failed; buffered lines are kept
    #[error("Failed to write remote log {location}: {source}")]
    RemoteWrite {
        location: BlobLocation,
        #[source]
        source: StorageError,
    },

    /// Storage failure while preparing the container or the log object
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Sink {sink} failed: {message}")]
    Sink { sink: String, message: String },
}

pub type Result<T> = std::result::Result<T, LoggerError>;
