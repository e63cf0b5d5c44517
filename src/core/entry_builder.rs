//! Chained context for attaching fields before a level call
//!
//! Every step borrows the previous builder and returns a new one, so a
//! partially built chain can be kept and reused as a base.

use super::fields::{FieldValue, Fields};
use super::log_level::LogLevel;
use super::log_writer::LogWriter;
use super::logger::{CallSite, Logger};
use chrono::{DateTime, FixedOffset};

/// Fields collected for one entry plus the logger that will write it
///
/// # Example
///
/// ```
/// use rust_structured_log::prelude::*;
///
/// let output = MemoryAppender::new();
/// let logger = Logger::builder()
///     .appender(output.clone())
///     .formatter(TextFormatter::new().with_disable_timestamp(true))
///     .build();
///
/// let request = logger.with_field("request_id", "abc-123");
/// request.with_field("status", 200).info("done");
/// request.warn("slow");
///
/// assert_eq!(
///     output.lines(),
///     vec![
///         "level=info msg=done request_id=abc-123 status=200",
///         "level=warning msg=slow request_id=abc-123",
///     ]
/// );
/// ```
#[derive(Clone)]
pub struct EntryBuilder<'a> {
    logger: &'a Logger,
    fields: Fields,
    time: Option<DateTime<FixedOffset>>,
}

impl<'a> EntryBuilder<'a> {
    pub fn new(logger: &'a Logger) -> Self {
        Self {
            logger,
            fields: Fields::new(),
            time: None,
        }
    }

    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        let mut next = self.clone();
        next.fields.insert(key, value);
        next
    }

    /// Merge `fields` over the ones collected so far
    #[must_use]
    pub fn with_fields(&self, fields: Fields) -> Self {
        Self {
            logger: self.logger,
            fields: Fields::merge(&self.fields, &fields),
            time: self.time,
        }
    }

    /// Set the `error` field to `err`'s message
    #[must_use]
    pub fn with_error(&self, err: &(dyn std::error::Error + '_)) -> Self {
        self.with_field("error", FieldValue::error(err))
    }

    /// Override the entry timestamp
    #[must_use]
    pub fn with_time(&self, time: impl Into<DateTime<FixedOffset>>) -> Self {
        Self {
            logger: self.logger,
            fields: self.fields.clone(),
            time: Some(time.into()),
        }
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    pub fn logger(&self) -> &'a Logger {
        self.logger
    }

    #[inline]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        self.logger.is_level_enabled(level)
    }

    /// An `io::Write` that logs every line at `level` with these fields
    #[track_caller]
    pub fn writer(&self, level: LogLevel) -> LogWriter<'a> {
        LogWriter::new(self.logger, self.fields.clone(), level, CallSite::here(None))
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(level, message, CallSite::here(None));
    }

    #[doc(hidden)]
    #[track_caller]
    pub fn log_from(&self, level: LogLevel, function: &'static str, message: impl Into<String>) {
        self.emit(level, message, CallSite::here(Some(function)));
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.emit(LogLevel::Trace, message, CallSite::here(None));
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message, CallSite::here(None));
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message, CallSite::here(None));
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message, CallSite::here(None));
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message, CallSite::here(None));
    }

    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.emit(LogLevel::Fatal, message, CallSite::here(None));
    }

    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> ! {
        self.logger
            .emit_panic(message, &self.fields, self.time, CallSite::here(None))
    }

    fn emit(&self, level: LogLevel, message: impl Into<String>, call_site: CallSite) {
        self.logger
            .emit(level, message, &self.fields, self.time, call_site);
    }
}
