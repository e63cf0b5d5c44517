//! Line-oriented `io::Write` adapter
//!
//! Lets code that only knows how to write bytes (a child process pipe, a
//! third-party library's debug output) feed a logger. Every complete line
//! becomes one entry; a trailing partial line is held until the next
//! newline, `flush` or drop.

use super::fields::Fields;
use super::log_level::LogLevel;
use super::logger::{CallSite, Logger};
use std::io::{self, Write};

/// Writer returned by [`Logger::writer`]
///
/// # Example
///
/// ```
/// use rust_structured_log::prelude::*;
/// use std::io::Write;
///
/// let output = MemoryAppender::new();
/// let logger = Logger::builder()
///     .appender(output.clone())
///     .formatter(TextFormatter::new().with_disable_timestamp(true))
///     .build();
///
/// let mut writer = logger.writer(LogLevel::Warn);
/// writer.write_all(b"first\nsecond").unwrap();
/// writer.flush().unwrap();
///
/// assert_eq!(output.lines(), vec!["level=warning msg=first", "level=warning msg=second"]);
/// ```
pub struct LogWriter<'a> {
    logger: &'a Logger,
    fields: Fields,
    level: LogLevel,
    call_site: CallSite,
    pending: Vec<u8>,
}

impl<'a> LogWriter<'a> {
    pub(crate) fn new(logger: &'a Logger, fields: Fields, level: LogLevel, call_site: CallSite) -> Self {
        Self {
            logger,
            fields,
            level,
            call_site,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> LogLevel {
        self.level
    }

    fn emit_line(&self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let message = String::from_utf8_lossy(line).into_owned();
        self.logger
            .emit(self.level, message, &self.fields, None, self.call_site);
    }
}

impl Write for LogWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);

        while let Some(pos) = self.pending.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            self.emit_line(&line[..pos]);
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        if !self.pending.is_empty() {
            let line = std::mem::take(&mut self.pending);
            self.emit_line(&line);
        }
        Ok(())
    }
}

impl Drop for LogWriter<'_> {
    fn drop(&mut self) {
        // a Panic-level writer must not unwind out of a drop that is already unwinding
        if !std::thread::panicking() {
            let _ = self.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::MemoryAppender;
    use crate::core::text_formatter::TextFormatter;

    fn logger(output: &MemoryAppender) -> Logger {
        Logger::builder()
            .appender(output.clone())
            .formatter(TextFormatter::new().with_disable_timestamp(true))
            .build()
    }

    #[test]
    fn test_lines_split_across_writes() {
        let output = MemoryAppender::new();
        let logger = logger(&output);
        let mut writer = logger.writer(LogLevel::Info);

        writer.write_all(b"hel").unwrap();
        assert!(output.contents().is_empty());
        writer.write_all(b"lo\r\nwor").unwrap();
        writer.write_all(b"ld\n").unwrap();

        assert_eq!(output.lines(), vec!["level=info msg=hello", "level=info msg=world"]);
    }

    #[test]
    fn test_partial_line_written_on_drop() {
        let output = MemoryAppender::new();
        let logger = logger(&output);
        {
            let mut writer = logger.with_field("source", "child").writer(LogLevel::Error);
            write!(writer, "exit status {}", 2).unwrap();
        }
        assert_eq!(
            output.contents(),
            "level=error msg=\"exit status 2\" source=child\n"
        );
    }

    #[test]
    fn test_filtered_level_writes_nothing() {
        let output = MemoryAppender::new();
        let logger = logger(&output);
        let mut writer = logger.writer(LogLevel::Debug);

        writer.write_all(b"quiet\n").unwrap();
        assert_eq!(writer.level(), LogLevel::Debug);
        assert!(output.contents().is_empty());
    }
}
