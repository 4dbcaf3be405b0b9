// blob-log - Application Layer
// - appender: buffered read-modify-overwrite appender for one remote object
// - logger: level filtering and fan-out to sinks (remote, console)
// - provider: lazily initialized process-level logger
// - observability: tracing layer forwarding events into the logger

pub mod appender;
pub mod logger;
pub mod metrics;
pub mod observability;
pub mod provider;

#[cfg(test)]
pub(crate) mod test_support;

pub use appender::BlobLogAppender;
pub use logger::{ConsoleSink, Logger, LoggerBuilder};
pub use metrics::{AppenderMetrics, MetricsSnapshot};
pub use observability::{BlobLogForwarder, BlobLogLayer, blob_log_layer};
pub use provider::LoggerProvider;
