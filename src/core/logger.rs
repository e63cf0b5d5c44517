//! Main logger implementation

use super::{
    appender::Appender,
    caller::{Frame, FunctionCache},
    config::LoggerConfig,
    entry_builder::EntryBuilder,
    error::{LoggerError, Result},
    fields::{FieldValue, Fields},
    formatter::{FormatContext, Formatter},
    log_entry::LogEntry,
    log_level::LogLevel,
    log_writer::LogWriter,
    metrics::LoggerMetrics,
    text_formatter::TextFormatter,
};
use crate::appenders::ConsoleAppender;
use chrono::{DateTime, FixedOffset, Local};
use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

/// Called with the exit status when a `Fatal` entry has been written
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Receives problems the logger cannot report through itself
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Where a log call was made from, resolved at the public entry point
#[derive(Debug, Clone, Copy)]
pub(crate) struct CallSite {
    pub(crate) location: &'static Location<'static>,
    pub(crate) function: Option<&'static str>,
}

impl CallSite {
    #[track_caller]
    pub(crate) fn here(function: Option<&'static str>) -> Self {
        Self {
            location: Location::caller(),
            function,
        }
    }
}

/// State guarded by the write lock
struct LoggerCore {
    outputs: Vec<Box<dyn Appender>>,
    formatter: Box<dyn Formatter>,
}

impl LoggerCore {
    fn all_terminal(&self) -> bool {
        !self.outputs.is_empty() && self.outputs.iter().all(|output| output.is_terminal())
    }
}

/// A leveled, structured logger
///
/// All methods take `&self`; share a logger between threads with `Arc` or
/// a `static`. Formatting and writing one record happens under a single
/// lock, so concurrent records never interleave.
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
/// logger
///     .with_field("animal", "walrus")
///     .with_field("number", 0)
///     .warn("foo");
///
/// assert_eq!(output.contents(), "level=warning msg=foo animal=walrus number=0\n");
/// ```
pub struct Logger {
    threshold: AtomicU8,
    report_caller: AtomicBool,
    core: Mutex<LoggerCore>,
    exit_handler: ExitHandler,
    on_error: ErrorCallback,
    metrics: LoggerMetrics,
    functions: FunctionCache,
    created_at: DateTime<FixedOffset>,
}

impl Logger {
    /// Logger writing plain text to stderr at `Info`
    #[must_use]
    pub fn new() -> Self {
        LoggerBuilder::new().build()
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_structured_log::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .level(LogLevel::Debug)
    ///     .formatter(JsonFormatter::new())
    ///     .report_caller(true)
    ///     .build();
    /// assert!(logger.is_level_enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.threshold.store(level as u8, Ordering::Relaxed);
    }

    pub fn level(&self) -> LogLevel {
        LogLevel::try_from(self.threshold.load(Ordering::Relaxed)).unwrap_or_default()
    }

    /// Whether a record at `level` would be written
    #[inline]
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        level.is_enabled_at(self.level())
    }

    /// Enable or disable caller reporting
    ///
    /// Takes the write lock, so a record being written while the flag
    /// changes is formatted entirely under the old setting.
    pub fn set_report_caller(&self, enabled: bool) {
        let _core = self.core.lock();
        self.report_caller.store(enabled, Ordering::Release);
    }

    pub fn report_caller(&self) -> bool {
        self.report_caller.load(Ordering::Acquire)
    }

    pub fn set_formatter(&self, formatter: impl Formatter + 'static) {
        self.core.lock().formatter = Box::new(formatter);
    }

    pub fn add_appender(&self, appender: impl Appender + 'static) {
        self.core.lock().outputs.push(Box::new(appender));
    }

    /// Replace every output at once
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] if `appenders` is empty.
    pub fn set_appenders(&self, appenders: Vec<Box<dyn Appender>>) -> Result<()> {
        if appenders.is_empty() {
            return Err(LoggerError::config(
                "Logger",
                "at least one output is required",
            ));
        }
        self.core.lock().outputs = appenders;
        Ok(())
    }

    /// Get the logger metrics
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every output, returning the first error after trying them all
    pub fn flush(&self) -> Result<()> {
        let mut core = self.core.lock();
        let mut first_error = None;
        for (idx, output) in core.outputs.iter_mut().enumerate() {
            if let Err(e) = output.flush() {
                first_error.get_or_insert(LoggerError::output_write(idx, output.name(), &e));
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Flush the outputs and hand `code` to the exit handler
    pub fn exit(&self, code: i32) {
        if let Err(e) = self.flush() {
            (self.on_error)(&e);
        }
        (self.exit_handler)(code);
    }

    /// Start a chain with one field
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> EntryBuilder<'_> {
        EntryBuilder::new(self).with_field(key, value)
    }

    /// Start a chain with a set of fields
    #[must_use]
    pub fn with_fields(&self, fields: Fields) -> EntryBuilder<'_> {
        EntryBuilder::new(self).with_fields(fields)
    }

    /// Start a chain with the `error` field set to `err`'s message
    #[must_use]
    pub fn with_error(&self, err: &(dyn std::error::Error + '_)) -> EntryBuilder<'_> {
        EntryBuilder::new(self).with_error(err)
    }

    /// Start a chain whose entry carries `time` instead of the current time
    #[must_use]
    pub fn with_time(&self, time: impl Into<DateTime<FixedOffset>>) -> EntryBuilder<'_> {
        EntryBuilder::new(self).with_time(time)
    }

    /// An `io::Write` that logs every line written to it at `level`
    #[track_caller]
    pub fn writer(&self, level: LogLevel) -> LogWriter<'_> {
        LogWriter::new(self, Fields::new(), level, CallSite::here(None))
    }

    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.emit(level, message, &Fields::new(), None, CallSite::here(None));
    }

    /// Like [`Logger::log`] with the calling function's path; used by the macros
    #[doc(hidden)]
    #[track_caller]
    pub fn log_from(&self, level: LogLevel, function: &'static str, message: impl Into<String>) {
        self.emit(level, message, &Fields::new(), None, CallSite::here(Some(function)));
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.emit(LogLevel::Trace, message, &Fields::new(), None, CallSite::here(None));
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.emit(LogLevel::Debug, message, &Fields::new(), None, CallSite::here(None));
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.emit(LogLevel::Info, message, &Fields::new(), None, CallSite::here(None));
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.emit(LogLevel::Warn, message, &Fields::new(), None, CallSite::here(None));
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.emit(LogLevel::Error, message, &Fields::new(), None, CallSite::here(None));
    }

    /// Log at `Fatal`, flush, then call the exit handler with status 1
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) {
        self.emit(LogLevel::Fatal, message, &Fields::new(), None, CallSite::here(None));
    }

    /// Log at `Panic`, then unwind with the [`LogEntry`] as panic payload
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> ! {
        self.emit_panic(message, &Fields::new(), None, CallSite::here(None))
    }

    pub(crate) fn emit(
        &self,
        level: LogLevel,
        message: impl Into<String>,
        fields: &Fields,
        time: Option<DateTime<FixedOffset>>,
        call_site: CallSite,
    ) {
        if level == LogLevel::Panic {
            self.emit_panic(message, fields, time, call_site);
        }

        let enabled = self.is_level_enabled(level);
        if !enabled && level != LogLevel::Fatal {
            return;
        }

        if enabled {
            let entry = self.build_entry(level, message.into(), fields, time, call_site);
            self.write_entry(&entry);
        }
        if level == LogLevel::Fatal {
            self.exit(1);
        }
    }

    pub(crate) fn emit_panic(
        &self,
        message: impl Into<String>,
        fields: &Fields,
        time: Option<DateTime<FixedOffset>>,
        call_site: CallSite,
    ) -> ! {
        let entry = self.build_entry(LogLevel::Panic, message.into(), fields, time, call_site);
        if self.is_level_enabled(LogLevel::Panic) {
            self.write_entry(&entry);
        }
        std::panic::panic_any(entry)
    }

    fn build_entry(
        &self,
        level: LogLevel,
        message: String,
        fields: &Fields,
        time: Option<DateTime<FixedOffset>>,
        call_site: CallSite,
    ) -> LogEntry {
        let mut entry = LogEntry::new(level, message).with_fields(fields.clone());
        if let Some(time) = time {
            entry = entry.with_timestamp(time);
        }
        if self.report_caller() {
            let resolved;
            let function = match call_site.function {
                Some(function) => Some(function),
                None => {
                    resolved = self.functions.function_at(call_site.location);
                    resolved.as_deref()
                }
            };
            entry = entry.with_caller(Frame::from_location(call_site.location, function));
        }
        entry
    }

    /// Format and write one entry under the write lock
    ///
    /// **Per-output isolation**: each output is wrapped in `catch_unwind`,
    /// and a failing output does not stop the remaining ones. Problems are
    /// reported after the lock is released.
    fn write_entry(&self, entry: &LogEntry) {
        let mut problems = Vec::new();
        {
            let mut core = self.core.lock();
            let mut ctx = FormatContext::new(core.all_terminal(), self.created_at);
            let formatted = core.formatter.format(entry, &mut ctx);

            for diagnostic in ctx.take_diagnostics() {
                self.metrics.record_formatter_warning();
                problems.push(diagnostic);
            }

            match formatted {
                Ok(record) => {
                    if let Some(e) = self.write_outputs(&mut core.outputs, &record) {
                        problems.push(e);
                    }
                }
                Err(e) => {
                    self.metrics.record_dropped();
                    problems.push(e);
                }
            }
        }

        for problem in &problems {
            (self.on_error)(problem);
        }
    }

    /// Write `record` to every output, returning the first error
    fn write_outputs(
        &self,
        outputs: &mut [Box<dyn Appender>],
        record: &[u8],
    ) -> Option<LoggerError> {
        let mut first_error = None;
        let mut written = false;

        for (idx, output) in outputs.iter_mut().enumerate() {
            let append_result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| output.append(record)));

            match append_result {
                Ok(Ok(())) => written = true,
                Ok(Err(e)) => {
                    self.metrics.record_write_error();
                    first_error.get_or_insert(LoggerError::output_write(idx, output.name(), &e));
                }
                Err(panic_info) => {
                    self.metrics.record_write_error();
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LOGGER CRITICAL] Output #{} ({}) panicked: {}. \
                         Other outputs continue to function.",
                        idx,
                        output.name(),
                        panic_msg
                    );
                    let cause = LoggerError::other(format!("panicked: {}", panic_msg));
                    first_error.get_or_insert(LoggerError::output_write(idx, output.name(), &cause));
                }
            }
        }

        if written {
            self.metrics.record_logged();
        }
        first_error
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("report_caller", &self.report_caller())
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

fn default_error_callback(err: &LoggerError) {
    match err {
        LoggerError::FormatterConfig { .. } => eprintln!("[LOGGER WARNING] {}", err),
        _ => eprintln!("[LOGGER ERROR] {}", err),
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_structured_log::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Trace)
///     .appender(ConsoleAppender::stdout())
///     .formatter(TextFormatter::new().with_full_timestamp(true))
///     .on_error(Arc::new(|err: &LoggerError| eprintln!("logging failed: {}", err)))
///     .build();
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    appenders: Vec<Box<dyn Appender>>,
    formatter: Option<Box<dyn Formatter>>,
    report_caller: bool,
    exit_handler: Option<ExitHandler>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            appenders: Vec::new(),
            formatter: None,
            report_caller: false,
            exit_handler: None,
            on_error: None,
        }
    }

    /// Set the threshold
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Add an output; without one, records go to stderr
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn formatter<F: Formatter + 'static>(mut self, formatter: F) -> Self {
        self.formatter = Some(Box::new(formatter));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn report_caller(mut self, enabled: bool) -> Self {
        self.report_caller = enabled;
        self
    }

    /// Replace `std::process::exit` as the action taken after a `Fatal` entry
    ///
    /// # Example
    ///
    /// ```
    /// use rust_structured_log::prelude::*;
    /// use std::sync::atomic::{AtomicI32, Ordering};
    /// use std::sync::Arc;
    ///
    /// let status = Arc::new(AtomicI32::new(0));
    /// let seen = Arc::clone(&status);
    /// let logger = Logger::builder()
    ///     .appender(MemoryAppender::new())
    ///     .exit_handler(Arc::new(move |code: i32| seen.store(code, Ordering::SeqCst)))
    ///     .build();
    ///
    /// logger.fatal("cannot continue");
    /// assert_eq!(status.load(Ordering::SeqCst), 1);
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn exit_handler(mut self, handler: ExitHandler) -> Self {
        self.exit_handler = Some(handler);
        self
    }

    /// Receive write and formatter problems instead of printing them to stderr
    #[must_use = "builder methods return a new value"]
    pub fn on_error(mut self, callback: ErrorCallback) -> Self {
        self.on_error = Some(callback);
        self
    }

    /// Apply the threshold, caller flag and formatter of a configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.level = config.level;
        self.report_caller = config.report_caller;
        self.formatter = Some(config.format.into_formatter());
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let mut outputs = self.appenders;
        if outputs.is_empty() {
            outputs.push(Box::new(ConsoleAppender::stderr()));
        }
        let formatter = self
            .formatter
            .unwrap_or_else(|| Box::new(TextFormatter::default()));

        Logger {
            threshold: AtomicU8::new(self.level as u8),
            report_caller: AtomicBool::new(self.report_caller),
            core: Mutex::new(LoggerCore { outputs, formatter }),
            exit_handler: self
                .exit_handler
                .unwrap_or_else(|| Arc::new(|code: i32| {
                    std::process::exit(code);
                })),
            on_error: self
                .on_error
                .unwrap_or_else(|| Arc::new(default_error_callback)),
            metrics: LoggerMetrics::new(),
            functions: FunctionCache::new(),
            created_at: Local::now().fixed_offset(),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
