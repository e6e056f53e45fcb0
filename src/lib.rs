//! # Leveled Logger
//!
//! A small leveled logger: messages carry a severity, anything below the
//! logger's threshold is dropped, and each surviving message becomes one
//! decorated line handed to a pluggable sink.
//!
//! ```text
//! [2025/01/08 10:30:45] main.rs:12 [Warn] disk at 91%
//! ```
//!
//! ## Features
//!
//! - **Six ordered levels**: Trace, Debug, Info, Warn, Error, Fatal
//! - **Composable decorations**: time, caller `file:line`, level name
//! - **Pluggable sinks**: stdout/stderr streams, files, or your own [`Sink`]
//! - **Thread Safe**: one lock per logger, lines never interleave
//! - **Default instance**: free functions over a process-wide [`Logger`]
//!
//! `Fatal` is a severity only. Logging at `Fatal` never ends the process.

pub mod core;
pub mod global;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        ErrorCallback, Flags, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics,
        Result, Sink, SourceLocation,
    };
    pub use crate::sinks::{FileSink, StreamSink};
}

pub use self::core::{
    ErrorCallback, Flags, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result,
    Sink, SourceLocation, TIME_FORMAT, UNKNOWN_FILE,
};
pub use global::{
    debug, default_logger, error, fatal, flush, info, init_default, set_level, trace, warn,
};
pub use sinks::{FileSink, StreamSink};
