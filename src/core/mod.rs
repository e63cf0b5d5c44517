//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod entry_builder;
pub mod error;
pub mod fields;
pub mod formatter;
pub mod json_formatter;
pub mod log_entry;
pub mod log_level;
pub mod log_writer;
pub mod logger;
pub mod metrics;
pub mod text_formatter;
pub mod timestamp;

pub use appender::Appender;
pub use caller::{CallerPrettifier, Frame};
pub use config::{LoggerConfig, OutputFormat};
pub use entry_builder::EntryBuilder;
pub use error::{LoggerError, Result};
pub use fields::{FieldValue, Fields};
pub use formatter::{FieldMap, FormatContext, Formatter};
pub use json_formatter::JsonFormatter;
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use log_writer::LogWriter;
pub use logger::{ErrorCallback, ExitHandler, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use text_formatter::{SortingFn, TextFormatter};
pub use timestamp::TimestampFormat;
