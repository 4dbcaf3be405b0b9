//! Buffered remote log appender
//!
//! Lines accumulate in a bounded [`LogBuffer`]. When the buffer fills, or on
//! an explicit flush, the appender reads the whole remote object, appends the
//! buffered lines and overwrites the object. The buffer is cleared only after
//! the overwrite succeeded, so a failed flush loses nothing that is still in
//! memory.
//!
//! The store has no append primitive and no concurrency control: one appender
//! per remote object.

use async_trait::async_trait;
use chrono::Local;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use blob_log_domain::logging::{
    DiagnosticSink, LineFormatter, LogBuffer, LogRecord, LogSink, StandardFormatter,
    StderrDiagnostics,
};
use blob_log_domain::shared_kernel::{LoggerError, Result};
use blob_log_domain::storage::{BlobLocation, BlobStore, StorageError, log_header};

use crate::metrics::{AppenderMetrics, MetricsSnapshot};

/// Sink name reported in errors
pub const REMOTE_SINK_NAME: &str = "remote-blob";

pub struct BlobLogAppender {
    store: Arc<dyn BlobStore>,
    location: BlobLocation,
    formatter: Arc<dyn LineFormatter>,
    diagnostics: Arc<dyn DiagnosticSink>,
    buffer: Mutex<LogBuffer>,
    metrics: Arc<AppenderMetrics>,
}

impl std::fmt::Debug for BlobLogAppender {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobLogAppender")
            .field("backend", &self.store.backend_name())
            .field("location", &self.location)
            .finish()
    }
}

impl BlobLogAppender {
    /// Create an appender for `location` without touching the store
    pub fn new(store: Arc<dyn BlobStore>, location: BlobLocation, capacity: usize) -> Self {
        Self {
            store,
            location,
            formatter: Arc::new(StandardFormatter::default()),
            diagnostics: Arc::new(StderrDiagnostics),
            buffer: Mutex::new(LogBuffer::new(capacity)),
            metrics: Arc::new(AppenderMetrics::new()),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Create an appender on a fresh timestamped object in `container` and
    /// make sure both exist remotely
    pub async fn initialize(
        store: Arc<dyn BlobStore>,
        container: &str,
        object_prefix: &str,
        capacity: usize,
    ) -> Result<Self> {
        let location = BlobLocation::timestamped(container, object_prefix, &Local::now());
        let appender = Self::new(store, location, capacity);
        appender.prepare().await?;
        Ok(appender)
    }

    /// Ensure the container and the log object exist
    ///
    /// A missing object is created holding only the start header; an existing
    /// one is reused untouched.
    pub async fn prepare(&self) -> Result<()> {
        let container = self.location.container();
        let object = self.location.object();

        if !self.store.container_exists(container).await? {
            match self.store.create_container(container).await {
                Ok(()) => info!(container, "Created log container"),
                Err(e) if e.is_already_exists() => {}
                Err(e) => return Err(e.into()),
            }
        }

        if !self.store.object_exists(container, object).await? {
            let header = log_header(&Local::now());
            match self
                .store
                .create_object(container, object, header.as_bytes())
                .await
            {
                Ok(()) => debug!(location = %self.location, "Created log object"),
                Err(e) if e.is_already_exists() => {}
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    pub fn location(&self) -> &BlobLocation {
        &self.location
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    /// Lines waiting for the next flush
    pub async fn buffered_lines(&self) -> Vec<String> {
        self.buffer.lock().await.lines().to_vec()
    }

    /// Format and buffer a record, flushing when the buffer fills
    pub async fn append(&self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format(record);
        self.append_line(&line).await
    }

    /// Buffer an already formatted line, flushing when the buffer fills
    pub async fn append_line(&self, line: &str) -> Result<()> {
        let mut buffer = self.buffer.lock().await;
        let full = buffer.push(line);
        self.metrics.record_append(buffer.len());
        if full {
            self.flush_locked(&mut buffer).await
        } else {
            Ok(())
        }
    }

    /// Persist buffered lines; an empty buffer makes no remote call
    pub async fn flush(&self) -> Result<()> {
        let mut buffer = self.buffer.lock().await;
        self.flush_locked(&mut buffer).await
    }

    async fn flush_locked(&self, buffer: &mut LogBuffer) -> Result<()> {
        if buffer.is_empty() {
            return Ok(());
        }

        match self.overwrite_with(buffer).await {
            Ok(object_size) => {
                let lines = buffer.len();
                let bytes = buffer.size_bytes();
                buffer.clear();
                self.metrics.record_flush(lines, bytes, object_size);
                debug!(
                    location = %self.location,
                    lines,
                    object_size,
                    "Flushed log buffer"
                );
                Ok(())
            }
            Err(source) => {
                self.metrics.record_failed_flush();
                self.diagnostics.report(&format!(
                    "Error writing to remote log {}: {}",
                    self.location, source
                ));
                Err(LoggerError::RemoteWrite {
                    location: self.location.clone(),
                    source,
                })
            }
        }
    }

    /// Read-modify-overwrite; returns the new object size
    async fn overwrite_with(&self, buffer: &LogBuffer) -> std::result::Result<usize, StorageError> {
        let container = self.location.container();
        let object = self.location.object();

        let mut content = match self.store.read_object(container, object).await {
            Ok(existing) => existing,
            Err(e) if e.is_not_found() => Vec::new(),
            Err(e) => return Err(e),
        };
        content.extend_from_slice(buffer.contents().as_bytes());

        self.store.write_object(container, object, &content).await?;
        Ok(content.len())
    }
}

#[async_trait]
impl LogSink for BlobLogAppender {
    fn name(&self) -> &str {
        REMOTE_SINK_NAME
    }

    async fn append(&self, line: &str) -> Result<()> {
        self.append_line(line).await
    }

    async fn flush(&self) -> Result<()> {
        BlobLogAppender::flush(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FlakyStore, RecordingDiagnostics};
    use blob_log_domain::shared_kernel::LogLevel;
    use blob_log_infrastructure::InMemoryBlobStore;

    const CONTAINER: &str = "logs";

    async fn memory_appender(capacity: usize) -> (Arc<InMemoryBlobStore>, BlobLogAppender) {
        let store = Arc::new(InMemoryBlobStore::new());
        let appender = BlobLogAppender::initialize(store.clone(), CONTAINER, "sec_filing", capacity)
            .await
            .unwrap();
        (store, appender)
    }

    async fn remote_text(store: &InMemoryBlobStore, appender: &BlobLogAppender) -> String {
        store
            .object_text(CONTAINER, appender.location().object())
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_initialize_creates_container_and_header() {
        let (store, appender) = memory_appender(10).await;

        let object = appender.location().object();
        assert!(object.starts_with("sec_filing_"));
        assert!(object.ends_with(".log"));

        let text = remote_text(&store, &appender).await;
        assert!(text.starts_with("=== Log started at "));
        assert!(text.contains("Log started at"));
        assert!(text.ends_with(" ===\n\n"));

        let stats = store.stats();
        assert_eq!(stats.containers_created, 1);
        assert_eq!(stats.objects_created, 1);
    }

    #[tokio::test]
    async fn test_prepare_reuses_existing_object() {
        let store = Arc::new(InMemoryBlobStore::new());
        store.create_container(CONTAINER).await.unwrap();
        store
            .create_object(CONTAINER, "existing.log", b"previous run\n")
            .await
            .unwrap();

        let appender =
            BlobLogAppender::new(store.clone(), BlobLocation::new(CONTAINER, "existing.log"), 5);
        appender.prepare().await.unwrap();

        assert_eq!(
            store.object_text(CONTAINER, "existing.log").await.unwrap(),
            "previous run\n"
        );
        assert_eq!(store.stats().containers_created, 1);
    }

    #[tokio::test]
    async fn test_under_capacity_makes_no_write() {
        let (store, appender) = memory_appender(5).await;
        let before = store.stats();

        for i in 0..4 {
            appender.append_line(&format!("line {}", i)).await.unwrap();
        }

        let after = store.stats();
        assert_eq!(after.reads, before.reads);
        assert_eq!(after.writes, before.writes);
        assert_eq!(appender.buffered_lines().await.len(), 4);
    }

    #[tokio::test]
    async fn test_capacity_triggers_flush() {
        let (store, appender) = memory_appender(3).await;

        for message in ["a", "b", "c"] {
            appender
                .append(&LogRecord::now(LogLevel::Info, message))
                .await
                .unwrap();
        }

        assert!(appender.buffered_lines().await.is_empty());
        let text = remote_text(&store, &appender).await;
        assert!(text.contains(" - INFO - a\n"));
        assert!(text.contains(" - INFO - b\n"));
        assert!(text.contains(" - INFO - c\n"));
        assert_eq!(store.stats().writes, 1);
    }

    #[tokio::test]
    async fn test_flush_preserves_history_in_order() {
        let (store, appender) = memory_appender(2).await;
        let header = remote_text(&store, &appender).await;

        for line in ["one", "two", "three", "four", "five"] {
            appender.append_line(line).await.unwrap();
        }
        appender.flush().await.unwrap();

        let text = remote_text(&store, &appender).await;
        assert_eq!(text, format!("{}one\ntwo\nthree\nfour\nfive\n", header));
    }

    #[tokio::test]
    async fn test_message_with_trailing_newline_gets_terminator() {
        let (store, appender) = memory_appender(10).await;

        appender
            .append(&LogRecord::now(LogLevel::Info, "done\n"))
            .await
            .unwrap();
        appender
            .append(&LogRecord::now(LogLevel::Info, "next"))
            .await
            .unwrap();
        appender.flush().await.unwrap();

        let text = remote_text(&store, &appender).await;
        assert!(text.contains(" - INFO - done\n\n"));
        assert!(text.ends_with(" - INFO - next\n"));
    }

    #[tokio::test]
    async fn test_empty_flush_makes_no_remote_call() {
        let (store, appender) = memory_appender(10).await;
        let before = store.stats();

        appender.flush().await.unwrap();

        assert_eq!(store.stats(), before);
        assert_eq!(appender.metrics().flushes, 0);
    }

    #[tokio::test]
    async fn test_failed_write_keeps_buffer() {
        let store = Arc::new(FlakyStore::new());
        let diagnostics = Arc::new(RecordingDiagnostics::default());
        let appender = BlobLogAppender::initialize(store.clone(), CONTAINER, "sec_filing", 10)
            .await
            .unwrap()
            .with_diagnostics(diagnostics.clone());

        appender.append_line("kept").await.unwrap();
        store.fail_writes(true);

        let err = appender.flush().await.unwrap_err();
        assert!(matches!(err, LoggerError::RemoteWrite { .. }));
        assert_eq!(appender.buffered_lines().await, vec!["kept\n".to_string()]);
        assert_eq!(appender.metrics().failed_flushes, 1);

        let reports = diagnostics.reports();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].starts_with("Error writing to remote log logs/sec_filing_"));

        store.fail_writes(false);
        appender.flush().await.unwrap();
        assert!(appender.buffered_lines().await.is_empty());
        let text = store
            .inner
            .object_text(CONTAINER, appender.location().object())
            .await
            .unwrap();
        assert!(text.ends_with("kept\n"));
    }

    #[tokio::test]
    async fn test_failed_read_keeps_buffer() {
        let store = Arc::new(FlakyStore::new());
        let appender = BlobLogAppender::initialize(store.clone(), CONTAINER, "sec_filing", 2)
            .await
            .unwrap()
            .with_diagnostics(Arc::new(RecordingDiagnostics::default()));

        store.fail_reads(true);
        appender.append_line("first").await.unwrap();
        let err = appender.append_line("second").await.unwrap_err();

        assert!(matches!(err, LoggerError::RemoteWrite { .. }));
        assert_eq!(appender.buffered_lines().await.len(), 2);
        assert_eq!(store.inner.stats().writes, 0);
    }

    #[tokio::test]
    async fn test_missing_object_at_flush_is_empty_content() {
        let store = Arc::new(InMemoryBlobStore::new());
        store.create_container(CONTAINER).await.unwrap();
        let appender =
            BlobLogAppender::new(store.clone(), BlobLocation::new(CONTAINER, "late.log"), 10);

        appender.append_line("only line").await.unwrap();
        appender.flush().await.unwrap();

        assert_eq!(
            store.object_text(CONTAINER, "late.log").await.unwrap(),
            "only line\n"
        );
    }

    #[tokio::test]
    async fn test_metrics_after_flushes() {
        let (_store, appender) = memory_appender(2).await;
        for line in ["x", "y", "z"] {
            appender.append_line(line).await.unwrap();
        }

        let metrics = appender.metrics();
        assert_eq!(metrics.lines_appended, 3);
        assert_eq!(metrics.flushes, 1);
        assert_eq!(metrics.lines_flushed, 2);
        assert_eq!(metrics.bytes_written, 4);
        assert_eq!(metrics.peak_buffered_lines, 2);
    }
}
