//! Multi-sink logger
//!
//! A [`Logger`] filters records by level, formats each accepted record once
//! and hands the line to every sink that accepts the record's level. The
//! remote appender and the console echo are both plain [`LogSink`]s.

use async_trait::async_trait;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tracing::debug;

use blob_log_domain::logging::{
    BoundaryKind, LineFormatter, LogRecord, LogSink, SectionBoundary, StandardFormatter,
};
use blob_log_domain::shared_kernel::{LogLevel, LoggerError, Result};
use blob_log_domain::storage::BlobLocation;

use crate::appender::BlobLogAppender;

/// Name of the logger built by the provider
pub const DEFAULT_LOGGER_NAME: &str = "sec_filing";

/// Sink name reported in errors
pub const CONSOLE_SINK_NAME: &str = "console";

/// Echoes lines at or above a threshold to a local stream (stderr by default)
pub struct ConsoleSink {
    threshold: LogLevel,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleSink {
    pub fn stderr(threshold: LogLevel) -> Self {
        Self::with_writer(threshold, std::io::stderr())
    }

    pub fn with_writer(threshold: LogLevel, writer: impl Write + Send + 'static) -> Self {
        Self {
            threshold,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    fn sink_error(message: impl std::fmt::Display) -> LoggerError {
        LoggerError::Sink {
            sink: CONSOLE_SINK_NAME.to_string(),
            message: message.to_string(),
        }
    }
}

impl std::fmt::Debug for ConsoleSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConsoleSink")
            .field("threshold", &self.threshold)
            .finish()
    }
}

#[async_trait]
impl LogSink for ConsoleSink {
    fn name(&self) -> &str {
        CONSOLE_SINK_NAME
    }

    fn accepts(&self, level: LogLevel) -> bool {
        level.passes(self.threshold)
    }

    async fn append(&self, line: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Self::sink_error("writer lock poisoned"))?;
        writeln!(writer, "{}", line.trim_end_matches('\n')).map_err(Self::sink_error)
    }

    async fn flush(&self) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| Self::sink_error("writer lock poisoned"))?;
        writer.flush().map_err(Self::sink_error)
    }
}

pub struct Logger {
    name: String,
    level: LogLevel,
    formatter: Arc<dyn LineFormatter>,
    sinks: Vec<Arc<dyn LogSink>>,
    remote: Option<Arc<BlobLogAppender>>,
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("level", &self.level)
            .field(
                "sinks",
                &self.sinks.iter().map(|s| s.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new(DEFAULT_LOGGER_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    pub fn remote(&self) -> Option<&Arc<BlobLogAppender>> {
        self.remote.as_ref()
    }

    pub fn location(&self) -> Option<&BlobLocation> {
        self.remote.as_ref().map(|appender| appender.location())
    }

    /// Name of the remote object receiving this logger's lines
    pub fn current_object_name(&self) -> Option<&str> {
        self.location().map(BlobLocation::object)
    }

    /// Deliver a record to every sink accepting its level
    ///
    /// Every sink is tried; the first failure is returned.
    pub async fn log_record(&self, record: &LogRecord) -> Result<()> {
        if !record.level().passes(self.level) {
            return Ok(());
        }

        let line = self.formatter.format(record);
        let mut first_error = None;
        for sink in &self.sinks {
            if !sink.accepts(record.level()) {
                continue;
            }
            if let Err(e) = sink.append(&line).await {
                debug!(sink = sink.name(), error = %e, "Sink rejected log line");
                first_error.get_or_insert(e);
            }
        }

        first_error.map_or(Ok(()), Err)
    }

    pub async fn log(&self, level: LogLevel, message: impl Into<String>) -> Result<()> {
        self.log_record(&LogRecord::now(level, message)).await
    }

    pub async fn debug(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Debug, message).await
    }

    pub async fn info(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Info, message).await
    }

    pub async fn warning(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Warning, message).await
    }

    pub async fn error(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Error, message).await
    }

    pub async fn critical(&self, message: impl Into<String>) -> Result<()> {
        self.log(LogLevel::Critical, message).await
    }

    /// Emit a START/END banner for a named phase as one INFO record
    pub async fn log_section_boundary(&self, name: &str, is_start: bool) -> Result<()> {
        let boundary = SectionBoundary::new(name, BoundaryKind::from_is_start(is_start));
        self.info(boundary.message()).await
    }

    /// Flush every sink; all are attempted, the first failure is returned
    pub async fn flush(&self) -> Result<()> {
        let mut first_error = None;
        for sink in &self.sinks {
            if let Err(e) = sink.flush().await {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Persist whatever is still buffered; call at normal shutdown
    pub async fn close(&self) -> Result<()> {
        self.flush().await?;
        debug!(logger = %self.name, "Logger closed");
        Ok(())
    }
}

pub struct LoggerBuilder {
    name: String,
    level: LogLevel,
    formatter: Arc<dyn LineFormatter>,
    sinks: Vec<Arc<dyn LogSink>>,
    remote: Option<Arc<BlobLogAppender>>,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            level: LogLevel::Info,
            formatter: Arc::new(StandardFormatter::default()),
            sinks: Vec::new(),
            remote: None,
        }
    }

    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Attach the remote appender; it becomes both a sink and the
    /// logger's object location
    pub fn remote(mut self, appender: Arc<BlobLogAppender>) -> Self {
        self.sinks.push(appender.clone());
        self.remote = Some(appender);
        self
    }

    pub fn console(self, console: ConsoleSink) -> Self {
        self.sink(Arc::new(console))
    }

    pub fn sink(mut self, sink: Arc<dyn LogSink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            name: self.name,
            level: self.level,
            formatter: self.formatter,
            sinks: self.sinks,
            remote: self.remote,
        }
    }
}
