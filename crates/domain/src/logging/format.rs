//! Line formatting
//!
//! Turns a [`LogRecord`] into the persisted, human readable text line:
//! `<timestamp> - <LEVEL> - <message>`.

use super::record::LogRecord;

/// Default timestamp layout, local time with millisecond precision
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

/// Formats a record into a single text line (without trailing newline)
pub trait LineFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

/// `timestamp - LEVEL - message` formatter
#[derive(Debug, Clone)]
pub struct StandardFormatter {
    timestamp_format: String,
}

impl StandardFormatter {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }
}

impl Default for StandardFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl LineFormatter for StandardFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!(
            "{} - {} - {}",
            record.timestamp().format(&self.timestamp_format),
            record.level(),
            record.message()
        )
    }
}
