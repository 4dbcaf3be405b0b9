pub mod config;
pub mod levels;

pub use config::{BlobLogConfig, ConfigError, ConfigLoader};
pub use levels::*;
