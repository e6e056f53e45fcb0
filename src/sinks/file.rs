//! File sink implementation

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink appending lines to a file, created if missing.
///
/// Each line goes out in a single `write_all` on a file opened in append
/// mode, so several processes can share one log file without tearing lines.
pub struct FileSink {
    file: File,
    path: PathBuf,
    name: String,
}

impl FileSink {
    /// # Examples
    ///
    /// ```no_run
    /// use leveled_logger::prelude::*;
    ///
    /// let sink = FileSink::new("/var/log/app.log").unwrap();
    /// let logger = Logger::new_default(sink);
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation("opening log file", path.display().to_string(), e)
            })?;
        let name = format!("file:{}", path.display());

        Ok(Self { file, path, name })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        self.file.write_all(line).map_err(|e| {
            LoggerError::io_operation("writing log file", self.path.display().to_string(), e)
        })
    }

    fn flush(&mut self) -> Result<()> {
        self.file.flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        let _ = self.file.sync_data();
    }
}
