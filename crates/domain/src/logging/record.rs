//! Log Record
//!
//! A single structured log event produced by an application call site.

use chrono::{DateTime, Local};

use crate::shared_kernel::LogLevel;

/// A single log event. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    timestamp: DateTime<Local>,
    level: LogLevel,
    message: String,
}

impl LogRecord {
    pub fn new(timestamp: DateTime<Local>, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            level,
            message: message.into(),
        }
    }

    /// Record stamped with the current local time
    pub fn now(level: LogLevel, message: impl Into<String>) -> Self {
        Self::new(Local::now(), level, message)
    }

    pub fn timestamp(&self) -> &DateTime<Local> {
        &self.timestamp
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}
