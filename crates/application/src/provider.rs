//! Process-level logger provider
//!
//! Owned by the composition root. The first successful `get_or_init` builds
//! the logger (store connection, container, timestamped object, sinks); every
//! later call returns the same instance and ignores its container argument.

use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::info;

use blob_log_domain::logging::{DiagnosticSink, StderrDiagnostics};
use blob_log_domain::shared_kernel::config::validate_container_name;
use blob_log_domain::shared_kernel::{BlobLogConfig, Result};
use blob_log_domain::storage::BlobStoreConnector;

use crate::appender::BlobLogAppender;
use crate::logger::{ConsoleSink, Logger, LoggerBuilder, DEFAULT_LOGGER_NAME};

pub struct LoggerProvider {
    config: BlobLogConfig,
    connector: Arc<dyn BlobStoreConnector>,
    diagnostics: Arc<dyn DiagnosticSink>,
    console: Option<Arc<ConsoleSink>>,
    logger: OnceCell<Arc<Logger>>,
}

impl LoggerProvider {
    pub fn new(config: BlobLogConfig, connector: Arc<dyn BlobStoreConnector>) -> Self {
        let console = Arc::new(ConsoleSink::stderr(config.console_level));
        Self {
            config,
            connector,
            diagnostics: Arc::new(StderrDiagnostics),
            console: Some(console),
            logger: OnceCell::new(),
        }
    }

    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    /// Replace the console echo, or drop it with `None`
    pub fn with_console(mut self, console: Option<ConsoleSink>) -> Self {
        self.console = console.map(Arc::new);
        self
    }

    pub fn config(&self) -> &BlobLogConfig {
        &self.config
    }

    /// Logger for this process, built on first use
    ///
    /// `container` falls back to the configured default. A failed build
    /// leaves the provider empty so a later call can retry. The logger is
    /// stored before its first line is written: if that write fails the
    /// error is returned, the line stays buffered and later calls reuse the
    /// same object.
    pub async fn get_or_init(&self, container: Option<&str>) -> Result<Arc<Logger>> {
        let mut built = false;
        let logger = self
            .logger
            .get_or_try_init(|| {
                built = true;
                self.build_logger(container)
            })
            .await?
            .clone();

        if built {
            Self::announce(&logger).await?;
        }
        Ok(logger)
    }

    /// Logger if already initialized
    pub fn get(&self) -> Option<Arc<Logger>> {
        self.logger.get().cloned()
    }

    pub fn current_object_name(&self) -> Option<String> {
        self.logger
            .get()
            .and_then(|logger| logger.current_object_name().map(str::to_string))
    }

    /// Flush the logger if it was ever initialized
    pub async fn shutdown(&self) -> Result<()> {
        match self.logger.get() {
            Some(logger) => logger.close().await,
            None => Ok(()),
        }
    }

    async fn build_logger(&self, container: Option<&str>) -> Result<Arc<Logger>> {
        let connection_string = self.config.require_connection_string()?;
        let container = container.unwrap_or(&self.config.container);
        validate_container_name(container)?;

        let store = self.connector.connect(connection_string)?;
        let appender = BlobLogAppender::initialize(
            store,
            container,
            &self.config.object_prefix,
            self.config.buffer_capacity,
        )
        .await?
        .with_diagnostics(self.diagnostics.clone());
        let location = appender.location().clone();

        let mut builder = LoggerBuilder::new(DEFAULT_LOGGER_NAME)
            .level(self.config.level)
            .remote(Arc::new(appender));
        if let Some(console) = &self.console {
            builder = builder.sink(console.clone());
        }
        info!(
            container = location.container(),
            object = location.object(),
            "Remote blob logger initialized"
        );
        Ok(Arc::new(builder.build()))
    }

    async fn announce(logger: &Logger) -> Result<()> {
        let Some(location) = logger.location() else {
            return Ok(());
        };
        logger
            .info(format!(
                "Logger initialized with remote blob storage. Logs saved to container '{}', blob '{}'",
                location.container(),
                location.object()
            ))
            .await
    }
}

impl std::fmt::Debug for LoggerProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerProvider")
            .field("container", &self.config.container)
            .field("initialized", &self.logger.initialized())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FlakyStore, RecordingDiagnostics};
    use blob_log_domain::shared_kernel::{ConfigError, LogLevel, LoggerError};
    use blob_log_domain::storage::BlobStore;
    use blob_log_infrastructure::InMemoryBlobStore;

    fn memory_provider(config: BlobLogConfig) -> (Arc<InMemoryBlobStore>, LoggerProvider) {
        let store = Arc::new(InMemoryBlobStore::new());
        let shared = store.clone();
        let connector = move |_: &str| -> std::result::Result<Arc<dyn BlobStore>, ConfigError> {
            let store: Arc<dyn BlobStore> = shared.clone();
            Ok(store)
        };
        let provider = LoggerProvider::new(config, Arc::new(connector)).with_console(None);
        (store, provider)
    }

    fn flaky_provider(config: BlobLogConfig) -> (Arc<FlakyStore>, LoggerProvider) {
        let store = Arc::new(FlakyStore::new());
        let shared = store.clone();
        let connector = move |_: &str| -> std::result::Result<Arc<dyn BlobStore>, ConfigError> {
            let store: Arc<dyn BlobStore> = shared.clone();
            Ok(store)
        };
        let provider = LoggerProvider::new(config, Arc::new(connector))
            .with_console(None)
            .with_diagnostics(Arc::new(RecordingDiagnostics::default()));
        (store, provider)
    }

    fn configured() -> BlobLogConfig {
        BlobLogConfig::default().with_connection_string("memory:")
    }

    #[tokio::test]
    async fn test_missing_credential_is_configuration_error() {
        let (store, provider) = memory_provider(BlobLogConfig::default());

        let err = provider.get_or_init(None).await.unwrap_err();

        assert!(matches!(
            err,
            LoggerError::Configuration(ConfigError::MissingRequired { .. })
        ));
        assert!(provider.get().is_none());
        assert_eq!(store.stats().container_checks, 0);
    }

    #[tokio::test]
    async fn test_invalid_container_is_configuration_error() {
        let (_store, provider) = memory_provider(configured());

        let err = provider.get_or_init(Some("Bad_Name")).await.unwrap_err();

        assert!(matches!(err, LoggerError::Configuration(_)));
    }

    #[tokio::test]
    async fn test_second_init_returns_same_logger() {
        let (store, provider) = memory_provider(configured());

        let first = provider.get_or_init(Some("filings")).await.unwrap();
        let second = provider.get_or_init(Some("ignored")).await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.current_object_name(), second.current_object_name());
        assert_eq!(first.location().unwrap().container(), "filings");
        assert_eq!(store.object_names("ignored").await.len(), 0);
        assert_eq!(store.stats().containers_created, 1);
        assert_eq!(
            provider.current_object_name().as_deref(),
            first.current_object_name()
        );
    }

    #[tokio::test]
    async fn test_default_container_and_init_message() {
        let (store, provider) = memory_provider(configured());

        let logger = provider.get_or_init(None).await.unwrap();
        provider.shutdown().await.unwrap();

        let object = logger.current_object_name().unwrap().to_string();
        assert!(object.starts_with("sec_filing_"));
        let text = store.object_text("logs", &object).await.unwrap();
        assert!(text.starts_with("=== Log started at "));
        assert!(text.contains(&format!(
            " - INFO - Logger initialized with remote blob storage. Logs saved to container 'logs', blob '{}'\n",
            object
        )));
    }

    #[tokio::test]
    async fn test_configured_levels_apply() {
        let mut config = configured();
        config.level = LogLevel::Warning;
        let (store, provider) = memory_provider(config);

        let logger = provider.get_or_init(None).await.unwrap();
        logger.info("skipped").await.unwrap();
        logger.warning("kept").await.unwrap();
        provider.shutdown().await.unwrap();

        let text = store
            .object_text("logs", logger.current_object_name().unwrap())
            .await
            .unwrap();
        assert!(!text.contains("skipped"));
        assert!(!text.contains("Logger initialized"));
        assert!(text.contains(" - WARNING - kept\n"));
    }

    #[tokio::test]
    async fn test_failed_init_line_keeps_logger_and_object() {
        let (store, provider) = flaky_provider(configured().with_buffer_capacity(1));
        store.fail_writes(true);

        let err = provider.get_or_init(None).await.unwrap_err();
        assert!(matches!(err, LoggerError::RemoteWrite { .. }));
        let first = provider.get().unwrap();

        let second = provider.get_or_init(None).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.inner.object_names("logs").await.len(), 1);

        store.fail_writes(false);
        provider.shutdown().await.unwrap();
        let text = store
            .inner
            .object_text("logs", first.current_object_name().unwrap())
            .await
            .unwrap();
        assert!(text.contains(" - INFO - Logger initialized with remote blob storage."));
    }

    #[tokio::test]
    async fn test_shutdown_before_init_is_noop() {
        let (store, provider) = memory_provider(configured());
        provider.shutdown().await.unwrap();
        assert_eq!(store.stats().container_checks, 0);
        assert!(provider.current_object_name().is_none());
    }
}
