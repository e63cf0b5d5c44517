//! # Rust Structured Log
//!
//! A leveled, structured logging engine: each call becomes one entry with
//! key/value fields, rendered by a text or JSON formatter and written to
//! every configured output.
//!
//! ## Features
//!
//! - **Structured fields**: chain `with_field` calls, later values win
//! - **Two formatters**: logfmt/colored text and one-object-per-line JSON
//! - **Caller reporting**: `#[track_caller]` call sites, optional prettifier
//! - **Thread safe**: one lock around format + write, records never interleave
//! - **Panic and Fatal levels**: unwind with the entry, or exit after flushing
//!
//! ```
//! use rust_structured_log::prelude::*;
//! use rust_structured_log::{fields, info};
//!
//! let output = MemoryAppender::new();
//! let logger = Logger::builder()
//!     .level(LogLevel::Debug)
//!     .appender(output.clone())
//!     .formatter(TextFormatter::new().with_disable_timestamp(true))
//!     .build();
//!
//! info!(logger.with_fields(fields! { "port" => 8080 }), "listening on {}", "0.0.0.0");
//! assert_eq!(output.contents(), "level=info msg=\"listening on 0.0.0.0\" port=8080\n");
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
    pub use crate::core::{
        Appender, CallerPrettifier, EntryBuilder, FieldMap, FieldValue, Fields, FormatContext,
        Formatter, Frame, JsonFormatter, LogEntry, LogLevel, LogWriter, Logger, LoggerBuilder,
        LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, Result, TextFormatter,
        TimestampFormat,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender, WriterAppender};
pub use crate::core::{
    Appender, CallerPrettifier, EntryBuilder, FieldMap, FieldValue, Fields, FormatContext,
    Formatter, Frame, JsonFormatter, LogEntry, LogLevel, LogWriter, Logger, LoggerBuilder,
    LoggerConfig, LoggerError, LoggerMetrics, OutputFormat, Result, TextFormatter,
    TimestampFormat,
};
