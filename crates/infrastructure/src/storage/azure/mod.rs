//! Azure Blob Storage backend
//!
//! Talks to the Blob service REST API directly with Shared Key
//! authorization. Only the handful of calls the log appender needs are
//! implemented: container get/create and blob head/get/put.

pub mod client;
pub mod connection_string;
pub mod signing;

pub use client::{AzureBlobStore, DEFAULT_REQUEST_TIMEOUT};
pub use connection_string::AzureConnectionString;
pub use signing::SharedKeyCredential;
