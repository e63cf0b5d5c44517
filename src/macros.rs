//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`. The first
//! argument is a [`Logger`](crate::Logger) or a chained
//! [`EntryBuilder`](crate::EntryBuilder). Unlike the plain methods, the
//! macros also record the calling function for caller reporting, and they
//! skip formatting the message when the level is filtered out.
//!
//! # Examples
//!
//! ```
//! use rust_structured_log::prelude::*;
//! use rust_structured_log::{info, fields};
//!
//! let logger = Logger::builder().appender(MemoryAppender::new()).build();
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//!
//! // With fields
//! info!(logger.with_fields(fields! { "user_id" => 42, "action" => "login" }), "User logged in");
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use rust_structured_log::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        match (&$logger, $level) {
            (logger, level) => {
                if level <= $crate::LogLevel::Fatal || logger.is_level_enabled(level) {
                    logger.log_from(level, $crate::function_name!(), ::std::format!($($arg)+));
                }
            }
        }
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # let logger = Logger::builder().level(LogLevel::Trace).appender(MemoryAppender::new()).build();
/// use rust_structured_log::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: {}", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use rust_structured_log::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use rust_structured_log::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use rust_structured_log::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use rust_structured_log::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message, then run the logger's exit handler.
///
/// # Examples
///
/// ```
/// # use rust_structured_log::prelude::*;
/// # use std::sync::Arc;
/// # let logger = Logger::builder()
/// #     .appender(MemoryAppender::new())
/// #     .exit_handler(Arc::new(|_: i32| {}))
/// #     .build();
/// use rust_structured_log::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}

/// Build a [`Fields`](crate::Fields) set from `key => value` pairs.
///
/// # Examples
///
/// ```
/// use rust_structured_log::fields;
///
/// let fields = fields! { "animal" => "walrus", "size" => 10 };
/// assert_eq!(fields.keys_sorted(), vec!["animal", "size"]);
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $( fields.insert($key, $value); )+
        fields
    }};
}

/// Path of the enclosing function, e.g. `my_crate::server::run`
#[doc(hidden)]
#[macro_export]
macro_rules! function_name {
    () => {{
        fn __logger_callsite() {}
        fn type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::core::caller::trim_function_name(type_name_of(__logger_callsite))
    }};
}
