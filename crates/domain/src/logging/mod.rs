//! Log records, formatting, buffering and sink ports

pub mod buffer;
pub mod format;
pub mod record;
pub mod section;
pub mod sink;

pub use buffer::LogBuffer;
pub use format::{LineFormatter, StandardFormatter};
pub use record::LogRecord;
pub use section::{BoundaryKind, SectionBoundary};
pub use sink::{DiagnosticSink, LogSink, StderrDiagnostics};
