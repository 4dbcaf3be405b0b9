// blob-log - Infrastructure Layer
// Concrete blob store adapters behind the domain BlobStore port:
// - storage: in-memory, local file system and Azure Blob Storage backends
// - connector: backend selection from a connection string

pub mod connector;
pub mod storage;

pub use connector::{DefaultBlobStoreConnector, StorageBackend};
pub use storage::*;
