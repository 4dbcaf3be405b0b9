//! Log Buffer
//!
//! Bounded, ordered sequence of formatted lines waiting to be flushed.
//! The buffer itself is not synchronized; its owner serializes access.

/// Default number of lines that triggers a flush
pub const DEFAULT_CAPACITY: usize = 10;

/// Buffer of newline-terminated lines awaiting persistence
#[derive(Debug, Clone)]
pub struct LogBuffer {
    lines: Vec<String>,
    capacity: usize,
    bytes_count: usize,
}

impl LogBuffer {
    /// Create a buffer flushing every `capacity` lines (at least one)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: Vec::with_capacity(capacity),
            capacity,
            bytes_count: 0,
        }
    }

    /// Push a line followed by its newline terminator
    ///
    /// Returns true when the buffer has reached its capacity
    pub fn push(&mut self, line: impl Into<String>) -> bool {
        let mut line = line.into();
        line.push('\n');
        self.bytes_count += line.len();
        self.lines.push(line);
        self.is_full()
    }

    pub fn is_full(&self) -> bool {
        self.lines.len() >= self.capacity
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Total size of the buffered lines in bytes
    pub fn size_bytes(&self) -> usize {
        self.bytes_count
    }

    /// Buffered lines, oldest first
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Concatenation of the buffered lines
    pub fn contents(&self) -> String {
        self.lines.concat()
    }

    /// Drop every buffered line
    pub fn clear(&mut self) {
        self.lines.clear();
        self.bytes_count = 0;
    }
}

impl Default for LogBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
