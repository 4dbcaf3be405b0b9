//! Sink ports
//!
//! A sink receives already formatted lines from the logger. The remote blob
//! appender and the console echo are both sinks.

use async_trait::async_trait;

use crate::shared_kernel::{LogLevel, Result};

#[async_trait]
pub trait LogSink: Send + Sync {
    /// Name used in errors and diagnostics
    fn name(&self) -> &str;

    /// Whether records of this level reach the sink
    fn accepts(&self, _level: LogLevel) -> bool {
        true
    }

    /// Accept one formatted line
    async fn append(&self, line: &str) -> Result<()>;

    /// Persist anything held back
    async fn flush(&self) -> Result<()> {
        Ok(())
    }
}

/// Local stream for reporting logger failures outside the logger itself
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, message: &str);
}

/// Writes diagnostics to the process stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrDiagnostics;

impl DiagnosticSink for StderrDiagnostics {
    fn report(&self, message: &str) {
        eprintln!("{}", message);
    }
}
