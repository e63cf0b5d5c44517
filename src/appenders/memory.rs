//! In-memory appender for tests and embedding

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects records in a shared buffer
///
/// Clones share the same buffer, so one clone can be handed to the logger
/// and another kept to inspect what was written.
#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<u8>>>,
    terminal: bool,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Report this output as an interactive terminal
    #[must_use]
    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn bytes(&self) -> Vec<u8> {
        self.buffer.lock().clone()
    }

    /// Written lines without their terminating newlines
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(record);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}
