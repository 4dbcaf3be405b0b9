//! Blob store implementations

pub mod azure;
pub mod local_fs;
pub mod memory;

pub use azure::{AzureBlobStore, AzureConnectionString};
pub use local_fs::{LocalFsBlobStore, LocalStorageConfig};
pub use memory::{InMemoryBlobStore, StoreStatsSnapshot};
