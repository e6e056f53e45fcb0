//! Sink implementations

pub mod file;
pub mod stream;

pub use file::FileSink;
pub use stream::StreamSink;

pub use crate::core::Sink;
