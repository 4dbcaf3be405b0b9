//! Blob Store Port
//!
//! Storage-agnostic contract for the remote key/blob store holding log
//! objects. Implementations live in the infrastructure crate (in-memory,
//! local files, Azure Blob Storage).

use async_trait::async_trait;
use std::sync::Arc;

use crate::shared_kernel::ConfigError;

/// Errors reported by blob store implementations
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Container not found: {container}")]
    ContainerNotFound { container: String },

    #[error("Object not found: {container}/{object}")]
    ObjectNotFound { container: String, object: String },

    #[error("Resource already exists: {resource}")]
    AlreadyExists { resource: String },

    #[error("Invalid name {name}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Storage service error: {service}: {message}")]
    Service { service: String, message: String },
}

impl StorageError {
    /// True for absent containers or objects, the first-use signal
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            StorageError::ContainerNotFound { .. } | StorageError::ObjectNotFound { .. }
        )
    }

    pub fn is_already_exists(&self) -> bool {
        matches!(self, StorageError::AlreadyExists { .. })
    }

    pub fn service(service: impl Into<String>, message: impl Into<String>) -> Self {
        StorageError::Service {
            service: service.into(),
            message: message.into(),
        }
    }
}

/// Remote key/blob store
///
/// Objects are written wholesale; there is no append primitive.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Short backend name used in diagnostics
    fn backend_name(&self) -> &'static str;

    async fn container_exists(&self, container: &str) -> Result<bool, StorageError>;

    /// Create a container. An existing container is reported as `AlreadyExists`.
    async fn create_container(&self, container: &str) -> Result<(), StorageError>;

    async fn object_exists(&self, container: &str, object: &str) -> Result<bool, StorageError>;

    /// Create an object with initial content. An existing object is reported
    /// as `AlreadyExists` and left untouched.
    async fn create_object(
        &self,
        container: &str,
        object: &str,
        initial_content: &[u8],
    ) -> Result<(), StorageError>;

    /// Full content of an object
    async fn read_object(&self, container: &str, object: &str) -> Result<Vec<u8>, StorageError>;

    /// Overwrite an object with the given content
    async fn write_object(
        &self,
        container: &str,
        object: &str,
        content: &[u8],
    ) -> Result<(), StorageError>;
}

/// Builds a [`BlobStore`] from a connection string
pub trait BlobStoreConnector: Send + Sync {
    fn connect(&self, connection_string: &str) -> Result<Arc<dyn BlobStore>, ConfigError>;
}

impl<F> BlobStoreConnector for F
where
    F: Fn(&str) -> Result<Arc<dyn BlobStore>, ConfigError> + Send + Sync,
{
    fn connect(&self, connection_string: &str) -> Result<Arc<dyn BlobStore>, ConfigError> {
        self(connection_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(StorageError::ContainerNotFound { container: "logs".into() }, true, false)]
    #[case(
        StorageError::ObjectNotFound { container: "logs".into(), object: "a.log".into() },
        true,
        false
    )]
    #[case(StorageError::AlreadyExists { resource: "logs".into() }, false, true)]
    #[case(StorageError::service("azure", "500"), false, false)]
    fn test_error_classification(
        #[case] err: StorageError,
        #[case] not_found: bool,
        #[case] already_exists: bool,
    ) {
        assert_eq!(err.is_not_found(), not_found);
        assert_eq!(err.is_already_exists(), already_exists);
    }

    #[test]
    fn test_service_error_display() {
        let err = StorageError::service("azure-blob", "HTTP 503");
        assert_eq!(err.to_string(), "Storage service error: azure-blob: HTTP 503");
    }
}
