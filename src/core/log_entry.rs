//! Log entry structure

use super::caller::Frame;
use super::fields::{FieldValue, Fields};
use super::log_level::LogLevel;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};
use std::any::Any;

/// One log record, built per call and immutable once handed to a formatter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<FixedOffset>,
    pub fields: Fields,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caller: Option<Frame>,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Local::now().fixed_offset(),
            fields: Fields::new(),
            caller: None,
        }
    }

    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<FixedOffset>) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_caller(mut self, caller: Frame) -> Self {
        self.caller = Some(caller);
        self
    }

    /// Field value by key
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn has_caller(&self) -> bool {
        self.caller.is_some()
    }

    /// Recover the entry carried by a panic raised at `Panic` level
    ///
    /// # Example
    ///
    /// ```
    /// use rust_structured_log::prelude::*;
    ///
    /// let logger = Logger::builder().appender(MemoryAppender::new()).build();
    /// let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
    ///     logger.with_field("animal", "orca").panic("It's over 9000!");
    /// }));
    ///
    /// let payload = caught.unwrap_err();
    /// let entry = LogEntry::from_panic_payload(payload.as_ref()).unwrap();
    /// assert_eq!(entry.message, "It's over 9000!");
    /// ```
    pub fn from_panic_payload(payload: &(dyn Any + Send)) -> Option<&LogEntry> {
        payload.downcast_ref::<LogEntry>()
    }
}
