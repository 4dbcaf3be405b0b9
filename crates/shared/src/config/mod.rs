//! Configuration module for the blob logger
//!
//! Centralized configuration loading, validation and the configuration DTO.
//!
//! # Architecture
//!
//! 1. **Single Source of Truth**: configuration is loaded once at startup
//! 2. **Fail Fast**: malformed values are reported immediately
//! 3. **DTO Pattern**: configuration is immutable and passed via dependency injection
//!
//! # Usage
//!
//! ```ignore
//! use blob_log_shared::config::ConfigLoader;
//! use std::path::PathBuf;
//!
//! let loader = ConfigLoader::new(Some(PathBuf::from(".env")));
//! let config = loader.load_blob_log_config()?;
//! println!("Container: {}", config.container);
//! ```
//!
//! # Environment Variables
//!
//! - `AZURE_STORAGE_CONNECTION_STRING`: storage credential, required when the
//!   logger is initialized
//! - `BLOB_LOG_CONTAINER`: default container (default: "logs")
//! - `BLOB_LOG_BUFFER_CAPACITY`: lines per flush (default: 10)
//! - `BLOB_LOG_OBJECT_PREFIX`: object name prefix (default: "sec_filing")
//! - `BLOB_LOG_LEVEL` / `BLOB_LOG_CONSOLE_LEVEL`: level thresholds
//! - `RUST_LOG`: tracing filter for the process console (default: "info")

pub mod dto;
pub mod error;
pub mod loader;
pub mod validator;

pub use dto::{BlobLogConfig, CONNECTION_STRING_VAR};
pub use error::{ConfigError, Result};
pub use loader::ConfigLoader;
pub use validator::{
    validate_blob_log_config, validate_buffer_capacity, validate_container_name,
    validate_object_prefix,
};
