//! Shared fixtures for application tests

use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use blob_log_domain::logging::DiagnosticSink;
use blob_log_domain::storage::{BlobStore, StorageError};
use blob_log_infrastructure::InMemoryBlobStore;

/// In-memory store whose reads and writes can be switched to fail
pub struct FlakyStore {
    pub inner: InMemoryBlobStore,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self {
            inner: InMemoryBlobStore::new(),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl BlobStore for FlakyStore {
    fn backend_name(&self) -> &'static str {
        "flaky"
    }

    async fn container_exists(&self, container: &str) -> Result<bool, StorageError> {
        self.inner.container_exists(container).await
    }

    async fn create_container(&self, container: &str) -> Result<(), StorageError> {
        self.inner.create_container(container).await
    }

    async fn object_exists(&self, container: &str, object: &str) -> Result<bool, StorageError> {
        self.inner.object_exists(container, object).await
    }

    async fn create_object(
        &self,
        container: &str,
        object: &str,
        initial_content: &[u8],
    ) -> Result<(), StorageError> {
        self.inner
            .create_object(container, object, initial_content)
            .await
    }

    async fn read_object(&self, container: &str, object: &str) -> Result<Vec<u8>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::service("flaky", "read refused"));
        }
        self.inner.read_object(container, object).await
    }

    async fn write_object(
        &self,
        container: &str,
        object: &str,
        content: &[u8],
    ) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::service("flaky", "write refused"));
        }
        self.inner.write_object(container, object, content).await
    }
}

/// Diagnostic sink that keeps every report
#[derive(Default)]
pub struct RecordingDiagnostics {
    reports: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
    pub fn reports(&self) -> Vec<String> {
        self.reports.lock().unwrap().clone()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn report(&self, message: &str) {
        self.reports.lock().unwrap().push(message.to_string());
    }
}

/// Cloneable in-memory writer for console sink tests
#[derive(Clone, Default)]
pub struct SharedWriter(Arc<Mutex<Vec<u8>>>);

impl SharedWriter {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
    }
}

impl Write for SharedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
