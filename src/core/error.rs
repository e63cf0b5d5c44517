//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level name or ordinal that does not map to a `LogLevel`
    #[error("not a valid log level: {value:?}")]
    InvalidLevel { value: String },

    /// A data field uses a key reserved by the formatter
    #[error("Formatter error ({format_type}): field '{key}' collides with a reserved key, written as '{written_as}'")]
    FormatterConfig {
        format_type: String,
        key: String,
        written_as: String,
    },

    /// One output failed to accept a record
    #[error("Output #{index} ({output}) failed: {message}")]
    OutputWrite {
        index: usize,
        output: String,
        message: String,
    },

    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(value: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            value: value.into(),
        }
    }

    /// Create a reserved-key collision error
    pub fn reserved_key(
        format_type: impl Into<String>,
        key: impl Into<String>,
        written_as: impl Into<String>,
    ) -> Self {
        LoggerError::FormatterConfig {
            format_type: format_type.into(),
            key: key.into(),
            written_as: written_as.into(),
        }
    }

    /// Create an output write error for the output at `index`
    pub fn output_write(index: usize, output: impl Into<String>, cause: &LoggerError) -> Self {
        LoggerError::OutputWrite {
            index,
            output: output.into(),
            message: cause.to_string(),
        }
    }

    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::invalid_level("loud");
        assert!(matches!(err, LoggerError::InvalidLevel { .. }));

        let err = LoggerError::config("Logger", "at least one output is required");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = LoggerError::reserved_key("text", "msg", "fields.msg");
        assert!(matches!(err, LoggerError::FormatterConfig { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::invalid_level("loud");
        assert_eq!(err.to_string(), "not a valid log level: \"loud\"");

        let err = LoggerError::reserved_key("json", "level", "fields.level");
        assert_eq!(
            err.to_string(),
            "Formatter error (json): field 'level' collides with a reserved key, written as 'fields.level'"
        );

        let cause = LoggerError::writer("disk full");
        let err = LoggerError::output_write(1, "file", &cause);
        assert_eq!(err.to_string(), "Output #1 (file) failed: Writer error: disk full");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open for append", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open for append"));
    }
}
