// blob-log - Domain Layer
// - shared_kernel: levels, configuration types and the logger error taxonomy
// - logging: records, formatting, buffering and sink ports
// - storage: blob store port and log object naming

pub mod logging;
pub mod shared_kernel;
pub mod storage;

pub use logging::*;
pub use shared_kernel::*;
pub use storage::*;
