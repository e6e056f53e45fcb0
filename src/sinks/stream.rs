//! Stream sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::io::{self, Stderr, Stdout, Write};

/// Sink writing each line to any [`Write`] stream and flushing it.
///
/// # Examples
///
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = Logger::new(StreamSink::stderr(), Flags::all());
/// logger.info("to stderr");
/// ```
pub struct StreamSink<W: Write + Send> {
    writer: W,
    name: String,
}

impl StreamSink<Stdout> {
    /// The sink the process-wide default logger uses.
    pub fn stdout() -> Self {
        Self::new(io::stdout()).with_name("stdout")
    }
}

impl StreamSink<Stderr> {
    pub fn stderr() -> Self {
        Self::new(io::stderr()).with_name("stderr")
    }
}

impl<W: Write + Send> StreamSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            name: "stream".to_string(),
        }
    }

    /// Set the name reported in sink errors
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write + Send> Sink for StreamSink<W> {
    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.writer
            .write_all(line)
            .and_then(|()| self.writer.flush())
            .map_err(|e| {
                LoggerError::io_operation("writing log line", format!("sink '{}'", self.name), e)
            })
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}
