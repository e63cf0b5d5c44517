//! File appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends records to a file through a buffered writer
///
/// Buffered data reaches the file on [`Appender::flush`] (the logger
/// flushes before a `Fatal` exit) and when the appender is dropped.
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
}

impl FileAppender {
    /// Open `path` for appending, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::IoOperation`] if the file cannot be opened.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}' for append", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, record: &[u8]) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_appender(self.path.display().to_string(), "writer not initialized")
        })?;

        writer.write_all(record)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
