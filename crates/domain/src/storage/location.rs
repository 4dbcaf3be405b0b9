//! Remote log object location and naming

use chrono::{DateTime, Local};
use std::fmt;

/// (container, object) pair identifying a remote log object
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobLocation {
    container: String,
    object: String,
}

impl BlobLocation {
    pub fn new(container: impl Into<String>, object: impl Into<String>) -> Self {
        Self {
            container: container.into(),
            object: object.into(),
        }
    }

    /// Location of a fresh log object named `<prefix>_<YYYYmmdd_HHMMSS>.log`
    pub fn timestamped(container: impl Into<String>, prefix: &str, now: &DateTime<Local>) -> Self {
        Self::new(container, log_object_name(prefix, now))
    }

    pub fn container(&self) -> &str {
        &self.container
    }

    pub fn object(&self) -> &str {
        &self.object
    }
}

impl fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.container, self.object)
    }
}

/// Object name derived from the given instant, second resolution
pub fn log_object_name(prefix: &str, now: &DateTime<Local>) -> String {
    format!("{}_{}.log", prefix, now.format("%Y%m%d_%H%M%S"))
}

/// Header written when a log object is created
pub fn log_header(now: &DateTime<Local>) -> String {
    format!(
        "=== Log started at {} ===\n\n",
        now.format("%Y-%m-%dT%H:%M:%S%.6f")
    )
}
