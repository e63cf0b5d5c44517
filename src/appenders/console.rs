//! Console appender implementation

use crate::core::{Appender, Result};
use std::io::{self, IsTerminal, Write};

/// Which standard stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleStream {
    Stdout,
    Stderr,
}

/// Writes records to stdout or stderr
///
/// Terminal detection happens once, at construction.
#[derive(Debug)]
pub struct ConsoleAppender {
    stream: ConsoleStream,
    terminal: bool,
}

impl ConsoleAppender {
    pub fn new(stream: ConsoleStream) -> Self {
        let terminal = match stream {
            ConsoleStream::Stdout => io::stdout().is_terminal(),
            ConsoleStream::Stderr => io::stderr().is_terminal(),
        };
        Self { stream, terminal }
    }

    pub fn stdout() -> Self {
        Self::new(ConsoleStream::Stdout)
    }

    pub fn stderr() -> Self {
        Self::new(ConsoleStream::Stderr)
    }

    pub fn stream(&self) -> ConsoleStream {
        self.stream
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::stderr()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        // one write_all per record, on a locked handle, keeps lines whole
        match self.stream {
            ConsoleStream::Stdout => io::stdout().lock().write_all(record)?,
            ConsoleStream::Stderr => io::stderr().lock().write_all(record)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.stream {
            ConsoleStream::Stdout => io::stdout().flush()?,
            ConsoleStream::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.stream {
            ConsoleStream::Stdout => "stdout",
            ConsoleStream::Stderr => "stderr",
        }
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}
