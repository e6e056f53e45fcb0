//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a logger expression followed by `format!`-style
//! arguments. Nothing is formatted when the level is below the logger's
//! threshold, and the reported `file:line` is the macro call site.
//!
//! # Examples
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::{info, warn};
//!
//! let logger = Logger::new(StreamSink::new(Vec::new()), Flags::LEVEL);
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! warn!(logger, "disk at {}%", 91);
//!
//! // The process-wide logger works the same way
//! info!(leveled_logger::default_logger(), "ambient message");
//! ```

/// Log a message at an explicit level.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new(StreamSink::new(Vec::new()), Flags::all());
/// use leveled_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.output($level, ::std::format_args!($($arg)+))
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new(StreamSink::new(Vec::new()), Flags::all());
/// # logger.set_level(LogLevel::Trace);
/// use leveled_logger::trace;
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
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message. Like [`Logger::fatal`](crate::Logger::fatal),
/// this returns normally.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new(StreamSink::new(Vec::new()), Flags::all());
/// use leveled_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// println!("still running");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
