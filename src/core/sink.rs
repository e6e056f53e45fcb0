//! Sink trait for log output destinations

use super::error::Result;

/// Destination for finished log lines.
///
/// `write_line` receives one complete line, trailing newline included, and
/// should hand it to the underlying destination in a single write. Errors are
/// reported, never retried, by the logger.
pub trait Sink: Send {
    fn write_line(&mut self, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for Box<S> {
    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        (**self).write_line(line)
    }

    fn flush(&mut self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
