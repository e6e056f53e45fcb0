//! Process-wide default logger
//!
//! The default logger is created on first use with every decoration enabled
//! and a stdout sink. To use a different logger, call [`init_default`] before
//! anything logs through the free functions below; once the default exists
//! it cannot be replaced.
//!
//! Library code should prefer taking a [`Logger`] explicitly. The free
//! functions are a convenience facade over the same [`Logger`] methods.

use crate::core::{LogLevel, Logger, LoggerError, Result};
use crate::sinks::StreamSink;
use std::fmt;
use std::sync::OnceLock;

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install `logger` as the process-wide default.
///
/// Fails with [`LoggerError::AlreadyInitialized`] if a default was already
/// installed or created by an earlier logging call.
///
/// # Example
///
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .flags(Flags::TIME | Flags::LEVEL)
///     .sink(StreamSink::stderr())
///     .build();
/// leveled_logger::init_default(logger).expect("first initialization");
/// leveled_logger::debug("goes to stderr");
/// ```
pub fn init_default(logger: Logger) -> Result<()> {
    DEFAULT_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::AlreadyInitialized)
}

/// The process-wide logger, created on first call if not installed.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| Logger::new_default(StreamSink::stdout()))
}

pub fn set_level(level: LogLevel) {
    default_logger().set_level(level);
}

pub fn flush() -> Result<()> {
    default_logger().flush()
}

#[track_caller]
pub fn trace(message: impl fmt::Display) {
    default_logger().trace(message);
}

#[track_caller]
pub fn debug(message: impl fmt::Display) {
    default_logger().debug(message);
}

#[track_caller]
pub fn info(message: impl fmt::Display) {
    default_logger().info(message);
}

#[track_caller]
pub fn warn(message: impl fmt::Display) {
    default_logger().warn(message);
}

#[track_caller]
pub fn error(message: impl fmt::Display) {
    default_logger().error(message);
}

/// Log at Fatal through the default logger and return.
#[track_caller]
pub fn fatal(message: impl fmt::Display) {
    default_logger().fatal(message);
}
