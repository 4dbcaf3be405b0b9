//! Storage factory - picks the blob store backend from a connection string
//!
//! - `memory:` → [`InMemoryBlobStore`]
//! - `file://<dir>` → [`LocalFsBlobStore`] rooted at `<dir>`
//! - anything else → Azure Storage connection string

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use blob_log_domain::shared_kernel::ConfigError;
use blob_log_domain::storage::{BlobStore, BlobStoreConnector};

use crate::storage::azure::DEFAULT_REQUEST_TIMEOUT;
use crate::storage::{
    AzureBlobStore, AzureConnectionString, InMemoryBlobStore, LocalFsBlobStore,
    LocalStorageConfig,
};

const MEMORY_SCHEME: &str = "memory:";
const FILE_SCHEME: &str = "file://";

/// Backend selected by a connection string
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Local(PathBuf),
    Azure,
}

impl StorageBackend {
    pub fn detect(connection_string: &str) -> Result<Self, ConfigError> {
        let trimmed = connection_string.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::InvalidConnectionString(
                "connection string is empty".to_string(),
            ));
        }
        if trimmed.eq_ignore_ascii_case(MEMORY_SCHEME) || trimmed.starts_with("memory://") {
            return Ok(StorageBackend::Memory);
        }
        if let Some(path) = trimmed.strip_prefix(FILE_SCHEME) {
            if path.is_empty() {
                return Err(ConfigError::InvalidConnectionString(
                    "file:// connection string needs a directory".to_string(),
                ));
            }
            return Ok(StorageBackend::Local(PathBuf::from(path)));
        }
        Ok(StorageBackend::Azure)
    }
}

/// Default [`BlobStoreConnector`]
#[derive(Debug, Clone)]
pub struct DefaultBlobStoreConnector {
    request_timeout: Duration,
}

impl DefaultBlobStoreConnector {
    pub fn new(request_timeout: Duration) -> Self {
        Self { request_timeout }
    }
}

impl Default for DefaultBlobStoreConnector {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_TIMEOUT)
    }
}

impl BlobStoreConnector for DefaultBlobStoreConnector {
    fn connect(&self, connection_string: &str) -> Result<Arc<dyn BlobStore>, ConfigError> {
        let store: Arc<dyn BlobStore> = match StorageBackend::detect(connection_string)? {
            StorageBackend::Memory => Arc::new(InMemoryBlobStore::new()),
            StorageBackend::Local(base_path) => {
                Arc::new(LocalFsBlobStore::new(LocalStorageConfig { base_path }))
            }
            StorageBackend::Azure => {
                let connection = AzureConnectionString::parse(connection_string)?;
                Arc::new(AzureBlobStore::new(connection, self.request_timeout)?)
            }
        };

        info!(backend = store.backend_name(), "Blob store connected");
        Ok(store)
    }
}
