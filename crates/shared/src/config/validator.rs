//! Configuration validation
//!
//! This module provides validation logic for configuration DTOs.

use super::dto::BlobLogConfig;
use super::error::{ConfigError, Result};

/// Validate a container name
///
/// Container names follow the blob storage rules: 3 to 63 characters,
/// lowercase letters, digits and hyphens, starting and ending with a letter
/// or digit, no consecutive hyphens.
///
/// # Returns
///
/// Ok(()) if valid, Err(ConfigError) if invalid
pub fn validate_container_name(name: &str) -> Result<()> {
    if name.len() < 3 || name.len() > 63 {
        return Err(ConfigError::Validation(format!(
            "Container name must be 3-63 characters long, got {} ({})",
            name.len(),
            name
        )));
    }

    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(ConfigError::Validation(format!(
            "Container name may only contain lowercase letters, digits and hyphens, got: {}",
            name
        )));
    }

    if name.starts_with('-') || name.ends_with('-') {
        return Err(ConfigError::Validation(format!(
            "Container name must start and end with a letter or digit, got: {}",
            name
        )));
    }

    if name.contains("--") {
        return Err(ConfigError::Validation(format!(
            "Container name cannot contain consecutive hyphens, got: {}",
            name
        )));
    }

    Ok(())
}

/// Validate the prefix used to derive log object names
pub fn validate_object_prefix(prefix: &str) -> Result<()> {
    if prefix.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Object prefix cannot be empty".to_string(),
        ));
    }

    if prefix.contains('/') || prefix.contains('\\') {
        return Err(ConfigError::Validation(format!(
            "Object prefix cannot contain path separators, got: {}",
            prefix
        )));
    }

    Ok(())
}

/// Validate the flush threshold
pub fn validate_buffer_capacity(capacity: usize) -> Result<()> {
    if capacity == 0 {
        return Err(ConfigError::Validation(
            "Buffer capacity must be at least 1".to_string(),
        ));
    }

    Ok(())
}

/// Validate the complete blob logger configuration
pub fn validate_blob_log_config(config: &BlobLogConfig) -> Result<()> {
    validate_container_name(&config.container)?;
    validate_object_prefix(&config.object_prefix)?;
    validate_buffer_capacity(config.buffer_capacity)?;
    Ok(())
}
