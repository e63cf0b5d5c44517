//! Appender over any `io::Write`

use crate::core::{Appender, Result};
use std::io::Write;

/// Forwards records to a wrapped writer
///
/// # Example
///
/// ```
/// use rust_structured_log::appenders::WriterAppender;
/// use rust_structured_log::core::Appender;
///
/// let mut appender = WriterAppender::new(Vec::new());
/// appender.append(b"level=info msg=hi\n").unwrap();
/// assert_eq!(appender.into_inner(), b"level=info msg=hi\n");
/// ```
pub struct WriterAppender<W: Write + Send> {
    writer: W,
    name: String,
    terminal: bool,
}

impl<W: Write + Send> WriterAppender<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "writer".to_string(),
            terminal: false,
        }
    }

    /// Name used in write error reports
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Declare the wrapped writer an interactive terminal
    #[must_use]
    pub fn with_terminal(mut self, terminal: bool) -> Self {
        self.terminal = terminal;
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Appender for WriterAppender<W> {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        self.writer.write_all(record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn is_terminal(&self) -> bool {
        self.terminal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LoggerError;
    use std::io;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "pipe closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_records_are_forwarded() {
        let mut appender = WriterAppender::new(Vec::new()).with_name("buffer");
        appender.append(b"a\n").unwrap();
        appender.append(b"b\n").unwrap();

        assert_eq!(appender.name(), "buffer");
        assert_eq!(appender.get_ref().as_slice(), b"a\nb\n");
    }

    #[test]
    fn test_io_errors_propagate() {
        let mut appender = WriterAppender::new(FailingWriter);
        let err = appender.append(b"lost\n").unwrap_err();
        assert!(matches!(err, LoggerError::IoError(_)));
    }
}
