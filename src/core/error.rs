//! Error types for the logger
//!
//! None of these ever escape a logging call. They are returned by
//! construction helpers and parsers, and handed to the error hook when a sink
//! fails.

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
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

    /// A sink rejected a line
    #[error("Sink '{sink}' failed: {message}")]
    SinkError { sink: String, message: String },

    /// A sink panicked while writing
    #[error("Sink '{sink}' panicked: {message}")]
    SinkPanicked { sink: String, message: String },

    /// Unknown severity name or number
    #[error("Invalid log level: '{value}'")]
    InvalidLevel { value: String },

    /// Unknown decoration flag name
    #[error("Invalid log flag: '{value}'")]
    InvalidFlags { value: String },

    /// The process-wide logger was already set or used
    #[error("Default logger already initialized")]
    AlreadyInitialized,

    /// A `Display` impl in the message reported an error; the line was dropped
    #[error("Formatter error ({format_type}): {message}")]
    FormatterError {
        format_type: String,
        message: String,
    },
}

impl LoggerError {
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

    pub fn sink(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkError {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn sink_panicked(sink: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkPanicked {
            sink: sink.into(),
            message: message.into(),
        }
    }

    pub fn invalid_level(value: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            value: value.into(),
        }
    }

    pub fn invalid_flags(value: impl Into<String>) -> Self {
        LoggerError::InvalidFlags {
            value: value.into(),
        }
    }

    pub fn formatter(format_type: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FormatterError {
            format_type: format_type.into(),
            message: message.into(),
        }
    }
}
