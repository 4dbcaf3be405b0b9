//! Tracing bridge
//!
//! [`BlobLogLayer`] turns `tracing` events into [`LogRecord`]s and queues
//! them on a bounded channel. [`BlobLogForwarder`] drains the channel into a
//! [`Logger`] on a task of its own, so emitting an event never waits on the
//! remote store. A full channel drops the event and counts it.
//!
//! Events whose target starts with [`INTERNAL_TARGET_PREFIX`] come from this
//! workspace's own crates and are not forwarded.

use std::fmt::Write as _;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::field::{Field, Visit};
use tracing::{Event, Level, Subscriber, debug};
use tracing_subscriber::Layer;
use tracing_subscriber::layer::Context;

use blob_log_domain::logging::LogRecord;
use blob_log_domain::shared_kernel::LogLevel;

use crate::logger::Logger;

/// Target prefix shared by every crate of the workspace
pub const INTERNAL_TARGET_PREFIX: &str = "blob_log";

/// Default number of events queued between the layer and the forwarder
pub const DEFAULT_CHANNEL_CAPACITY: usize = 1024;

/// Build a connected layer/forwarder pair
pub fn blob_log_layer(logger: Arc<Logger>, capacity: usize) -> (BlobLogLayer, BlobLogForwarder) {
    let (sender, receiver) = mpsc::channel(capacity.max(1));
    let dropped = Arc::new(AtomicU64::new(0));
    let layer = BlobLogLayer {
        sender,
        dropped: dropped.clone(),
    };
    let forwarder = BlobLogForwarder {
        receiver,
        logger,
        dropped,
    };
    (layer, forwarder)
}

pub struct BlobLogLayer {
    sender: mpsc::Sender<LogRecord>,
    dropped: Arc<AtomicU64>,
}

impl BlobLogLayer {
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl<S: Subscriber> Layer<S> for BlobLogLayer {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if is_internal_target(metadata.target()) {
            return;
        }

        let mut visitor = MessageVisitor::default();
        event.record(&mut visitor);
        let record = LogRecord::now(map_level(metadata.level()), visitor.finish());

        if self.sender.try_send(record).is_err() {
            self.dropped.fetch_add(1, Ordering::Relaxed);
        }
    }
}

/// Drains queued events into the logger
pub struct BlobLogForwarder {
    receiver: mpsc::Receiver<LogRecord>,
    logger: Arc<Logger>,
    dropped: Arc<AtomicU64>,
}

impl BlobLogForwarder {
    /// Events lost to a full channel so far
    pub fn dropped_events(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Forward until every layer is gone, then close the logger
    pub async fn run(mut self) {
        while let Some(record) = self.receiver.recv().await {
            // Remote failures are already reported by the appender
            if let Err(e) = self.logger.log_record(&record).await {
                debug!(error = %e, "Forwarded event not persisted");
            }
        }

        let dropped = self.dropped_events();
        if dropped > 0 {
            debug!(dropped, "Tracing events dropped on a full channel");
        }
        if let Err(e) = self.logger.close().await {
            debug!(error = %e, "Logger close failed after channel shutdown");
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}

fn is_internal_target(target: &str) -> bool {
    target.starts_with(INTERNAL_TARGET_PREFIX)
}

fn map_level(level: &Level) -> LogLevel {
    if *level == Level::ERROR {
        LogLevel::Error
    } else if *level == Level::WARN {
        LogLevel::Warning
    } else if *level == Level::INFO {
        LogLevel::Info
    } else {
        LogLevel::Debug
    }
}

/// Collects the `message` field plus the remaining fields as `key=value`
#[derive(Default)]
struct MessageVisitor {
    message: String,
    fields: String,
}

impl MessageVisitor {
    fn push_field(&mut self, name: &str, value: impl std::fmt::Display) {
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={}", name, value);
    }

    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for MessageVisitor {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        } else {
            self.push_field(field.name(), value);
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{:?}", value);
        } else {
            self.push_field(field.name(), format_args!("{:?}", value));
        }
    }
}
