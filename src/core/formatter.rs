//! Formatter contract shared by the text and JSON renderers

use super::caller::{CallerPrettifier, Frame};
use super::error::{LoggerError, Result};
use super::fields::Fields;
use super::log_entry::LogEntry;
use chrono::{DateTime, FixedOffset, Local};
use serde::{Deserialize, Serialize};

/// Renders one entry into the bytes of one record, newline terminated
///
/// Implementations must be a pure function of their configuration, the
/// entry and the [`FormatContext`].
pub trait Formatter: Send + Sync {
    fn format(&self, entry: &LogEntry, ctx: &mut FormatContext) -> Result<Vec<u8>>;
    fn name(&self) -> &str;
}

/// Environment a formatter may depend on, supplied by the logger per record
#[derive(Debug)]
pub struct FormatContext {
    /// Every configured output is an interactive terminal
    pub terminal: bool,
    /// Origin of the relative `[0001]` counter (logger creation)
    pub base_timestamp: DateTime<FixedOffset>,
    diagnostics: Vec<LoggerError>,
}

impl FormatContext {
    pub fn new(terminal: bool, base_timestamp: DateTime<FixedOffset>) -> Self {
        Self {
            terminal,
            base_timestamp,
            diagnostics: Vec::new(),
        }
    }

    /// Record a non-fatal problem found while formatting
    pub fn report(&mut self, diagnostic: LoggerError) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[LoggerError] {
        &self.diagnostics
    }

    pub fn take_diagnostics(&mut self) -> Vec<LoggerError> {
        std::mem::take(&mut self.diagnostics)
    }
}

impl Default for FormatContext {
    fn default() -> Self {
        Self::new(false, Local::now().fixed_offset())
    }
}

/// Names of the fixed keys written by the formatters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMap {
    pub time: String,
    pub level: String,
    pub msg: String,
    pub func: String,
    pub file: String,
}

impl Default for FieldMap {
    fn default() -> Self {
        Self {
            time: "time".to_string(),
            level: "level".to_string(),
            msg: "msg".to_string(),
            func: "func".to_string(),
            file: "file".to_string(),
        }
    }
}

impl FieldMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_key(mut self, key: impl Into<String>) -> Self {
        self.time = key.into();
        self
    }

    #[must_use]
    pub fn with_level_key(mut self, key: impl Into<String>) -> Self {
        self.level = key.into();
        self
    }

    #[must_use]
    pub fn with_msg_key(mut self, key: impl Into<String>) -> Self {
        self.msg = key.into();
        self
    }

    #[must_use]
    pub fn with_func_key(mut self, key: impl Into<String>) -> Self {
        self.func = key.into();
        self
    }

    #[must_use]
    pub fn with_file_key(mut self, key: impl Into<String>) -> Self {
        self.file = key.into();
        self
    }

    /// Keys a data field must not use; caller keys only count when a caller is present
    pub fn reserved_keys(&self, has_caller: bool) -> Vec<&str> {
        let mut keys = vec![self.time.as_str(), self.level.as_str(), self.msg.as_str()];
        if has_caller {
            keys.push(self.func.as_str());
            keys.push(self.file.as_str());
        }
        keys
    }
}

/// Rename data fields that collide with reserved keys to `fields.<key>`
///
/// Each collision is reported to `ctx`; the field itself is kept. When
/// `fields.<key>` is already taken the prefix is repeated until the name is
/// free.
pub(crate) fn prefix_field_clashes(
    fields: &Fields,
    field_map: &FieldMap,
    has_caller: bool,
    format_type: &str,
    ctx: &mut FormatContext,
) -> Fields {
    let reserved = field_map.reserved_keys(has_caller);
    if !fields.keys().any(|key| reserved.contains(&key)) {
        return fields.clone();
    }

    let mut renamed = Fields::new();
    for (key, value) in fields.iter() {
        if reserved.contains(&key) {
            let mut target = format!("fields.{}", key);
            while fields.contains_key(&target) || renamed.contains_key(&target) {
                target = format!("fields.{}", target);
            }
            ctx.report(LoggerError::reserved_key(format_type, key, target.as_str()));
            renamed.insert(target, value.clone());
        } else {
            renamed.insert(key, value.clone());
        }
    }
    renamed
}

/// The `(function, file)` pair to display for a frame
///
/// `default_pair` is used when no prettifier is configured.
pub(crate) fn caller_pair(
    frame: &Frame,
    prettifier: Option<&CallerPrettifier>,
    default_pair: impl FnOnce(&Frame) -> (String, String),
) -> (String, String) {
    match prettifier {
        Some(prettify) => prettify(frame),
        None => default_pair(frame),
    }
}
