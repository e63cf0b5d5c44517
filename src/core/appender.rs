//! Appender trait for log output destinations

use super::error::Result;

/// A sink that accepts whole formatted records
///
/// The logger calls `append` once per record, with the bytes of exactly one
/// newline-terminated line (or JSON object), while holding its write lock.
pub trait Appender: Send {
    fn append(&mut self, record: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Whether this output is an interactive terminal
    fn is_terminal(&self) -> bool {
        false
    }
}

impl<A: Appender + ?Sized> Appender for Box<A> {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        (**self).append(record)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }

    fn is_terminal(&self) -> bool {
        (**self).is_terminal()
    }
}
