//! Log level definitions
//!
//! Levels are ordered by severity: `Panic` is the most severe and has the
//! lowest ordinal, `Trace` the least severe. A record is emitted when
//! `record_level <= threshold`.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
#[repr(u8)]
pub enum LogLevel {
    Panic = 0,
    Fatal = 1,
    Error = 2,
    Warn = 3,
    #[default]
    Info = 4,
    Debug = 5,
    Trace = 6,
}

impl LogLevel {
    /// All levels, most severe first
    pub const ALL: [LogLevel; 7] = [
        LogLevel::Panic,
        LogLevel::Fatal,
        LogLevel::Error,
        LogLevel::Warn,
        LogLevel::Info,
        LogLevel::Debug,
        LogLevel::Trace,
    ];

    /// Canonical lowercase name
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Panic => "panic",
            LogLevel::Fatal => "fatal",
            LogLevel::Error => "error",
            LogLevel::Warn => "warning",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    /// Uppercase name, as shown by the colored text layout with truncation disabled
    pub fn upper(&self) -> &'static str {
        match self {
            LogLevel::Panic => "PANIC",
            LogLevel::Fatal => "FATAL",
            LogLevel::Error => "ERROR",
            LogLevel::Warn => "WARNING",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBUG",
            LogLevel::Trace => "TRACE",
        }
    }

    /// Fixed-width four letter tag
    pub fn abbreviation(&self) -> &'static str {
        match self {
            LogLevel::Panic => "PANI",
            LogLevel::Fatal => "FATA",
            LogLevel::Error => "ERRO",
            LogLevel::Warn => "WARN",
            LogLevel::Info => "INFO",
            LogLevel::Debug => "DEBU",
            LogLevel::Trace => "TRAC",
        }
    }

    /// Length of the longest uppercase name, used to pad level tags
    pub fn max_name_len() -> usize {
        Self::ALL.iter().map(|level| level.upper().len()).max().unwrap_or(0)
    }

    /// Whether a record at `self` passes a logger whose threshold is `threshold`
    #[inline]
    pub fn is_enabled_at(self, threshold: LogLevel) -> bool {
        self <= threshold
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Trace | LogLevel::Debug => White,
            LogLevel::Info => Cyan,
            LogLevel::Warn => Yellow,
            LogLevel::Error | LogLevel::Fatal | LogLevel::Panic => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "panic" => Ok(LogLevel::Panic),
            "fatal" => Ok(LogLevel::Fatal),
            "error" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggerError::invalid_level(s)),
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(ordinal: u8) -> Result<Self, LoggerError> {
        LogLevel::ALL
            .get(usize::from(ordinal))
            .copied()
            .ok_or_else(|| LoggerError::invalid_level(ordinal.to_string()))
    }
}

impl TryFrom<String> for LogLevel {
    type Error = LoggerError;

    fn try_from(name: String) -> Result<Self, LoggerError> {
        name.parse()
    }
}

impl From<LogLevel> for String {
    fn from(level: LogLevel) -> Self {
        level.as_str().to_string()
    }
}
