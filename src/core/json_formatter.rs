//! JSON formatter for structured logging
//!
//! Writes each entry as one JSON object (JSONL), keys in the order
//! `level`, `msg`, `time`, `func`, `file`, then the fields.

use super::caller::CallerPrettifier;
use super::error::Result;
use super::fields::{FieldValue, Fields};
use super::formatter::{caller_pair, prefix_field_clashes, FieldMap, FormatContext, Formatter};
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::fmt;

/// JSON formatter configuration
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonFormatter {
    pub timestamp_format: TimestampFormat,
    /// Omit the timestamp key
    pub disable_timestamp: bool,
    /// Write `<`, `>` and `&` literally instead of as `\u00XX` escapes
    pub disable_html_escape: bool,
    /// Nest all fields under this key instead of flattening them
    pub data_key: Option<String>,
    pub field_map: FieldMap,
    /// Indent output over several lines
    pub pretty_print: bool,
    #[serde(skip)]
    pub caller_prettifier: Option<CallerPrettifier>,
}

impl fmt::Debug for JsonFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JsonFormatter")
            .field("timestamp_format", &self.timestamp_format)
            .field("disable_timestamp", &self.disable_timestamp)
            .field("disable_html_escape", &self.disable_html_escape)
            .field("data_key", &self.data_key)
            .field("field_map", &self.field_map)
            .field("pretty_print", &self.pretty_print)
            .field("caller_prettifier", &self.caller_prettifier.is_some())
            .finish()
    }
}

impl JsonFormatter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use]
    pub fn with_disable_timestamp(mut self, disable: bool) -> Self {
        self.disable_timestamp = disable;
        self
    }

    #[must_use]
    pub fn with_disable_html_escape(mut self, disable: bool) -> Self {
        self.disable_html_escape = disable;
        self
    }

    #[must_use]
    pub fn with_data_key(mut self, key: impl Into<String>) -> Self {
        self.data_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_field_map(mut self, field_map: FieldMap) -> Self {
        self.field_map = field_map;
        self
    }

    #[must_use]
    pub fn with_pretty_print(mut self, pretty: bool) -> Self {
        self.pretty_print = pretty;
        self
    }

    #[must_use]
    pub fn with_caller_prettifier(mut self, prettifier: CallerPrettifier) -> Self {
        self.caller_prettifier = Some(prettifier);
        self
    }

    fn build_object(
        &self,
        entry: &LogEntry,
        ctx: &mut FormatContext,
    ) -> serde_json::Map<String, serde_json::Value> {
        let map = &self.field_map;
        let mut json_obj = serde_json::Map::new();

        json_obj.insert(
            map.level.clone(),
            serde_json::Value::String(entry.level.as_str().to_string()),
        );
        json_obj.insert(
            map.msg.clone(),
            serde_json::Value::String(entry.message.clone()),
        );
        if !self.disable_timestamp {
            json_obj.insert(
                map.time.clone(),
                self.timestamp_format.to_json_value(&entry.timestamp),
            );
        }

        if let Some(frame) = &entry.caller {
            let (function, file) = caller_pair(frame, self.caller_prettifier.as_ref(), |frame| {
                (frame.function.clone(), frame.file_line())
            });
            if !function.is_empty() {
                json_obj.insert(map.func.clone(), serde_json::Value::String(function));
            }
            if !file.is_empty() {
                json_obj.insert(map.file.clone(), serde_json::Value::String(file));
            }
        }

        match &self.data_key {
            Some(data_key) => {
                let nested: serde_json::Map<String, serde_json::Value> = entry
                    .fields
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_json_value()))
                    .collect();
                let wrapper = Fields::new().with(data_key.as_str(), FieldValue::Bool(true));
                let checked =
                    prefix_field_clashes(&wrapper, map, entry.has_caller(), self.name(), ctx);
                let key = checked
                    .keys()
                    .next()
                    .map_or_else(|| data_key.clone(), str::to_string);
                json_obj.insert(key, serde_json::Value::Object(nested));
            }
            None => {
                let data =
                    prefix_field_clashes(&entry.fields, map, entry.has_caller(), self.name(), ctx);
                for (key, value) in data.iter() {
                    json_obj.insert(key.to_string(), value.to_json_value());
                }
            }
        }

        json_obj
    }
}

impl Formatter for JsonFormatter {
    fn format(&self, entry: &LogEntry, ctx: &mut FormatContext) -> Result<Vec<u8>> {
        let value = serde_json::Value::Object(self.build_object(entry, ctx));

        let mut json = if self.pretty_print {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        if !self.disable_html_escape {
            json = escape_html(&json);
        }
        json.push('\n');

        Ok(json.into_bytes())
    }

    fn name(&self) -> &str {
        "json"
    }
}

/// Escape HTML-significant characters; they only occur inside JSON strings
fn escape_html(json: &str) -> String {
    if !json.contains(['<', '>', '&']) {
        return json.to_string();
    }
    json.replace('<', "\\u003c")
        .replace('>', "\\u003e")
        .replace('&', "\\u0026")
}
