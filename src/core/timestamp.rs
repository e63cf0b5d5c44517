//! Timestamp formatting utilities
//!
//! Provides the wall-clock layouts available to the text and JSON
//! formatters. All layouts keep the entry's UTC offset.

use chrono::{DateTime, FixedOffset, SecondsFormat};
use serde::{Deserialize, Serialize};

/// Standardized timestamp format options
///
/// # Examples
///
/// ```
/// use rust_structured_log::core::TimestampFormat;
/// use chrono::{FixedOffset, TimeZone};
///
/// let ts = FixedOffset::east_opt(9 * 3600)
///     .unwrap()
///     .with_ymd_and_hms(2019, 3, 11, 23, 23, 44)
///     .unwrap();
/// assert_eq!(TimestampFormat::Rfc3339.format(&ts), "2019-03-11T23:23:44+09:00");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with seconds precision: `2019-03-11T23:23:44+09:00`
    ///
    /// A zero offset is written as `Z`.
    #[default]
    Rfc3339,

    /// RFC 3339 with the shortest of milli-, micro- or nanosecond precision: `2019-03-11T23:23:44.123456+09:00`
    Rfc3339Nano,

    /// ISO 8601 with milliseconds: `2019-03-11T23:23:44.123+09:00`
    Iso8601,

    /// ISO 8601 with microseconds: `2019-03-11T23:23:44.123456+09:00`
    Iso8601Micros,

    /// Unix timestamp in seconds: `1552314224`
    Unix,

    /// Unix timestamp in milliseconds: `1552314224123`
    UnixMillis,

    /// Unix timestamp in microseconds: `1552314224123456`
    UnixMicros,

    /// Custom strftime format
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_structured_log::core::TimestampFormat;
    ///
    /// // Apache log format
    /// let format = TimestampFormat::Custom("%d/%b/%Y:%H:%M:%S %z".to_string());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a timestamp according to this format
    #[must_use]
    pub fn format(&self, datetime: &DateTime<FixedOffset>) -> String {
        match self {
            TimestampFormat::Rfc3339 => datetime.to_rfc3339_opts(SecondsFormat::Secs, true),
            TimestampFormat::Rfc3339Nano => {
                datetime.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            }
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3f%:z").to_string(),
            TimestampFormat::Iso8601Micros => {
                datetime.format("%Y-%m-%dT%H:%M:%S%.6f%:z").to_string()
            }
            TimestampFormat::Unix => datetime.timestamp().to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::UnixMicros => datetime.timestamp_micros().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// JSON representation: numbers for Unix layouts, strings otherwise
    #[must_use]
    pub fn to_json_value(&self, datetime: &DateTime<FixedOffset>) -> serde_json::Value {
        match self {
            TimestampFormat::Unix => serde_json::Value::Number(datetime.timestamp().into()),
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            TimestampFormat::UnixMicros => {
                serde_json::Value::Number(datetime.timestamp_micros().into())
            }
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}
