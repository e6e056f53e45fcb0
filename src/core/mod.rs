//! Core logger types and traits

pub mod error;
pub mod flags;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod timestamp;

pub use error::{LoggerError, Result};
pub use flags::Flags;
pub use log_level::LogLevel;
pub use logger::{ErrorCallback, Logger, LoggerBuilder, SourceLocation, UNKNOWN_FILE};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use timestamp::TIME_FORMAT;
