//! Remote storage port and log object naming

pub mod blob_store;
pub mod location;

pub use blob_store::{BlobStore, BlobStoreConnector, StorageError};
pub use location::{BlobLocation, log_header, log_object_name};
