//! Local file system blob store
//!
//! Maps containers to sub-directories of a base path and objects to files.
//! Overwrites go through a temporary file and a rename so readers never see
//! a half-written log.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::PathBuf;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use blob_log_domain::storage::{BlobStore, StorageError};

/// Local file storage configuration
#[derive(Debug, Clone)]
pub struct LocalStorageConfig {
    pub base_path: PathBuf,
}

#[derive(Debug, Clone)]
pub struct LocalFsBlobStore {
    base_path: PathBuf,
}

impl LocalFsBlobStore {
    pub fn new(config: LocalStorageConfig) -> Self {
        debug!("Local blob storage rooted at: {:?}", config.base_path);
        Self {
            base_path: config.base_path,
        }
    }

    fn container_path(&self, container: &str) -> Result<PathBuf, StorageError> {
        validate_name(container)?;
        Ok(self.base_path.join(container))
    }

    fn object_path(&self, container: &str, object: &str) -> Result<PathBuf, StorageError> {
        validate_name(object)?;
        Ok(self.container_path(container)?.join(object))
    }

    async fn ensure_container(&self, container: &str) -> Result<PathBuf, StorageError> {
        let path = self.container_path(container)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_dir() => Ok(path),
            Ok(_) => Err(StorageError::InvalidName {
                name: container.to_string(),
                reason: "exists and is not a directory".to_string(),
            }),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::ContainerNotFound {
                container: container.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }
}

/// Names become single path components; anything that could escape the
/// base directory is rejected
fn validate_name(name: &str) -> Result<(), StorageError> {
    let reason = if name.is_empty() {
        Some("name cannot be empty")
    } else if name.contains('/') || name.contains('\\') {
        Some("name cannot contain path separators")
    } else if name == "." || name == ".." {
        Some("name cannot be a relative directory")
    } else if name.starts_with('.') {
        Some("name cannot start with a dot")
    } else {
        None
    };

    match reason {
        Some(reason) => Err(StorageError::InvalidName {
            name: name.to_string(),
            reason: reason.to_string(),
        }),
        None => Ok(()),
    }
}

#[async_trait]
impl BlobStore for LocalFsBlobStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn container_exists(&self, container: &str) -> Result<bool, StorageError> {
        let path = self.container_path(container)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_dir()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        let path = self.container_path(container)?;
        tokio::fs::create_dir_all(&self.base_path).await?;
        match tokio::fs::create_dir(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Err(StorageError::AlreadyExists {
                resource: container.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn object_exists(&self, container: &str, object: &str) -> Result<bool, StorageError> {
        let path = self.object_path(container, object)?;
        match tokio::fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn create_object(
        &self,
        container: &str,
        object: &str,
        initial_content: &[u8],
    ) -> Result<(), StorageError> {
        self.ensure_container(container).await?;
        let path = self.object_path(container, object)?;

        let mut file = match tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(StorageError::AlreadyExists {
                    resource: format!("{}/{}", container, object),
                });
            }
            Err(e) => return Err(e.into()),
        };

        file.write_all(initial_content).await?;
        file.flush().await?;
        Ok(())
    }

    async fn read_object(&self, container: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        self.ensure_container(container).await?;
        let path = self.object_path(container, object)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::ObjectNotFound {
                container: container.to_string(),
                object: object.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_object(
        &self,
        container: &str,
        object: &str,
        content: &[u8],
    ) -> Result<(), StorageError> {
        let dir = self.ensure_container(container).await?;
        let path = self.object_path(container, object)?;
        let tmp_path = dir.join(format!(".{}.tmp", object));

        tokio::fs::write(&tmp_path, content).await?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        debug!(
            container = container,
            object = object,
            bytes = content.len(),
            "Local blob overwritten"
        );
        Ok(())
    }
}
