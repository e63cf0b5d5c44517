//! Serializable logger configuration

use super::formatter::Formatter;
use super::json_formatter::JsonFormatter;
use super::log_level::LogLevel;
use super::text_formatter::TextFormatter;
use serde::{Deserialize, Serialize};

/// Which formatter to install, with its options
///
/// Tagged by `type`:
///
/// ```
/// use rust_structured_log::core::OutputFormat;
///
/// let format: OutputFormat =
///     serde_json::from_str(r#"{"type":"json","pretty_print":true}"#).unwrap();
/// assert!(matches!(format, OutputFormat::Json(ref json) if json.pretty_print));
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OutputFormat {
    Text(TextFormatter),
    Json(JsonFormatter),
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Text(TextFormatter::default())
    }
}

impl OutputFormat {
    pub fn into_formatter(self) -> Box<dyn Formatter> {
        match self {
            OutputFormat::Text(text) => Box::new(text),
            OutputFormat::Json(json) => Box::new(json),
        }
    }
}

/// Settings applied by [`LoggerBuilder::config`](super::LoggerBuilder::config)
///
/// Every key is optional; missing keys keep their defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub report_caller: bool,
    pub format: OutputFormat,
}
