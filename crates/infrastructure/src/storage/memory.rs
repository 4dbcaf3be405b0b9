//! In-memory blob store
//!
//! Process-local store used for dry runs and tests. Counts every operation
//! so callers can assert on remote traffic.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use blob_log_domain::storage::{BlobStore, StorageError};

/// Operation counters for a store
#[derive(Debug, Default)]
pub struct StoreOperationStats {
    container_checks: AtomicU64,
    containers_created: AtomicU64,
    object_checks: AtomicU64,
    objects_created: AtomicU64,
    reads: AtomicU64,
    writes: AtomicU64,
}

/// Point-in-time copy of [`StoreOperationStats`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStatsSnapshot {
    pub container_checks: u64,
    pub containers_created: u64,
    pub object_checks: u64,
    pub objects_created: u64,
    pub reads: u64,
    pub writes: u64,
}

impl StoreOperationStats {
    pub fn snapshot(&self) -> StoreStatsSnapshot {
        StoreStatsSnapshot {
            container_checks: self.container_checks.load(Ordering::Relaxed),
            containers_created: self.containers_created.load(Ordering::Relaxed),
            object_checks: self.object_checks.load(Ordering::Relaxed),
            objects_created: self.objects_created.load(Ordering::Relaxed),
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

type Containers = HashMap<String, HashMap<String, Vec<u8>>>;

#[derive(Debug, Default)]
pub struct InMemoryBlobStore {
    containers: RwLock<Containers>,
    stats: StoreOperationStats,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> StoreStatsSnapshot {
        self.stats.snapshot()
    }

    /// Object content as text, `None` when absent
    pub async fn object_text(&self, container: &str, object: &str) -> Option<String> {
        let containers = self.containers.read().await;
        containers
            .get(container)
            .and_then(|objects| objects.get(object))
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// Object names of a container, sorted
    pub async fn object_names(&self, container: &str) -> Vec<String> {
        let containers = self.containers.read().await;
        let mut names: Vec<String> = containers
            .get(container)
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn container_exists(&self, container: &str) -> Result<bool, StorageError> {
        StoreOperationStats::bump(&self.stats.container_checks);
        Ok(self.containers.read().await.contains_key(container))
    }

    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        let mut containers = self.containers.write().await;
        if containers.contains_key(container) {
            return Err(StorageError::AlreadyExists {
                resource: container.to_string(),
            });
        }
        containers.insert(container.to_string(), HashMap::new());
        StoreOperationStats::bump(&self.stats.containers_created);
        Ok(())
    }

    async fn object_exists(&self, container: &str, object: &str) -> Result<bool, StorageError> {
        StoreOperationStats::bump(&self.stats.object_checks);
        let containers = self.containers.read().await;
        Ok(containers
            .get(container)
            .is_some_and(|objects| objects.contains_key(object)))
    }

    async fn create_object(
        &self,
        container: &str,
        object: &str,
        initial_content: &[u8],
    ) -> Result<(), StorageError> {
        let mut containers = self.containers.write().await;
        let objects =
            containers
                .get_mut(container)
                .ok_or_else(|| StorageError::ContainerNotFound {
                    container: container.to_string(),
                })?;
        if objects.contains_key(object) {
            return Err(StorageError::AlreadyExists {
                resource: format!("{}/{}", container, object),
            });
        }
        objects.insert(object.to_string(), initial_content.to_vec());
        StoreOperationStats::bump(&self.stats.objects_created);
        Ok(())
    }

    async fn read_object(&self, container: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        StoreOperationStats::bump(&self.stats.reads);
        let containers = self.containers.read().await;
        let objects = containers
            .get(container)
            .ok_or_else(|| StorageError::ContainerNotFound {
                container: container.to_string(),
            })?;
        objects
            .get(object)
            .cloned()
            .ok_or_else(|| StorageError::ObjectNotFound {
                container: container.to_string(),
                object: object.to_string(),
            })
    }

    async fn write_object(
        &self,
        container: &str,
        object: &str,
        content: &[u8],
    ) -> Result<(), StorageError> {
        StoreOperationStats::bump(&self.stats.writes);
        let mut containers = self.containers.write().await;
        let objects =
            containers
                .get_mut(container)
                .ok_or_else(|| StorageError::ContainerNotFound {
                    container: container.to_string(),
                })?;
        objects.insert(object.to_string(), content.to_vec());
        Ok(())
    }
}
