//! Main logger implementation

use super::{
    error::{LoggerError, Result},
    flags::Flags,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::Sink,
    timestamp,
};
use crate::sinks::StreamSink;
use parking_lot::Mutex;
use std::fmt::{self, Write};
use std::panic::{self, Location};
use std::sync::Arc;

/// Callback invoked with every sink or formatting failure.
///
/// Runs after the logger lock has been released, so it may log through the
/// same logger.
pub type ErrorCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

/// Rendered in place of `file:line` when no call site is known.
pub const UNKNOWN_FILE: &str = "???";

/// Source position rendered by the [`Flags::FILE`] decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation<'a> {
    pub file: &'a str,
    pub line: u32,
}

impl<'a> SourceLocation<'a> {
    pub const fn new(file: &'a str, line: u32) -> Self {
        Self { file, line }
    }

    /// Location of the innermost caller that is not `#[track_caller]`.
    #[track_caller]
    pub fn caller() -> SourceLocation<'static> {
        Location::caller().into()
    }

    /// Final path component of `file`, for either separator style.
    pub fn basename(&self) -> &'a str {
        self.file.rsplit(['/', '\\']).next().unwrap_or(self.file)
    }
}

impl<'a> From<&'a Location<'a>> for SourceLocation<'a> {
    fn from(location: &'a Location<'a>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// State that only exists inside the lock.
struct Inner {
    level: LogLevel,
    sink: Box<dyn Sink>,
    /// Cleared before each render and after each sink call.
    buf: String,
}

/// Leveled logger writing decorated lines to one sink.
///
/// Every call takes the same mutex for the whole decorate, format, write and
/// reset sequence, so lines from concurrent callers never interleave and a
/// slow sink slows every caller.
///
/// # Fatal does not terminate
///
/// [`Logger::fatal`] writes a `[Fatal]` line and returns. It does not exit,
/// abort or panic; the level is a label like any other.
///
/// # Example
///
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = Logger::new(StreamSink::new(Vec::new()), Flags::LEVEL);
/// logger.warn(format_args!("disk at {}%", 91));
/// logger.debug("dropped, below Info");
/// ```
pub struct Logger {
    inner: Mutex<Inner>,
    flags: Flags,
    metrics: LoggerMetrics,
    on_error: Option<ErrorCallback>,
}

impl Logger {
    /// Logger writing to `sink` with the given decorations, threshold Info.
    #[must_use]
    pub fn new(sink: impl Sink + 'static, flags: Flags) -> Self {
        Self::from_parts(Box::new(sink), flags, LogLevel::Info, None)
    }

    /// Logger with every decoration enabled.
    #[must_use]
    pub fn new_default(sink: impl Sink + 'static) -> Self {
        Self::new(sink, Flags::all())
    }

    fn from_parts(
        sink: Box<dyn Sink>,
        flags: Flags,
        level: LogLevel,
        on_error: Option<ErrorCallback>,
    ) -> Self {
        Self {
            inner: Mutex::new(Inner {
                level,
                sink,
                buf: String::with_capacity(256),
            }),
            flags,
            metrics: LoggerMetrics::new(),
            on_error,
        }
    }

    /// Replace the threshold. Calls issued after this returns see the new value.
    pub fn set_level(&self, level: LogLevel) {
        self.inner.lock().level = level;
    }

    pub fn level(&self) -> LogLevel {
        self.inner.lock().level
    }

    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// Whether a message at `level` would currently be written.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.inner.lock().level
    }

    /// Counters for written, filtered and failed lines.
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Name of the sink this logger writes to.
    pub fn sink_name(&self) -> String {
        self.inner.lock().sink.name().to_string()
    }

    /// Write one line at `level`, attributing it to the caller's call site.
    #[track_caller]
    pub fn output(&self, level: LogLevel, args: fmt::Arguments<'_>) {
        self.output_at(Some(SourceLocation::caller()), level, args);
    }

    /// Write one line at `level` with an explicit call site.
    ///
    /// `None` renders the `???:0` placeholder when [`Flags::FILE`] is set.
    pub fn output_at(
        &self,
        location: Option<SourceLocation<'_>>,
        level: LogLevel,
        args: fmt::Arguments<'_>,
    ) {
        let mut inner = self.inner.lock();

        if level < inner.level {
            self.metrics.record_filtered();
            return;
        }

        let Inner { sink, buf, .. } = &mut *inner;
        // A Display impl that panics mid-render leaves its bytes behind.
        buf.clear();
        if let Err(e) = self.render(buf, location, level, args) {
            buf.clear();
            drop(inner);
            self.report(LoggerError::formatter("message", e.to_string()));
            return;
        }

        let result =
            panic::catch_unwind(panic::AssertUnwindSafe(|| sink.write_line(buf.as_bytes())));
        buf.clear();

        let failure = match result {
            Ok(Ok(())) => None,
            Ok(Err(e)) => Some(e),
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                Some(LoggerError::sink_panicked(sink.name(), panic_msg))
            }
        };
        drop(inner);

        match failure {
            None => {
                self.metrics.record_written();
            }
            Some(e) => self.report(e),
        }
    }

    /// Fails only when a `Display` impl in `args` returns an error. The
    /// partially rendered line is then discarded, never handed to the sink.
    fn render(
        &self,
        buf: &mut String,
        location: Option<SourceLocation<'_>>,
        level: LogLevel,
        args: fmt::Arguments<'_>,
    ) -> fmt::Result {
        if self.flags.contains(Flags::TIME) {
            write!(buf, "[{}] ", timestamp::now())?;
        }

        if self.flags.contains(Flags::FILE) {
            let (file, line) = match location {
                Some(loc) => (loc.basename(), loc.line),
                None => (UNKNOWN_FILE, 0),
            };
            write!(buf, "{}:{} ", file, line)?;
        }

        if self.flags.contains(Flags::LEVEL) {
            write!(buf, "[{}] ", level.to_str())?;
        }

        buf.write_fmt(args)?;

        if !buf.ends_with('\n') {
            buf.push('\n');
        }
        Ok(())
    }

    fn report(&self, err: LoggerError) {
        self.metrics.record_failure();
        match self.on_error {
            Some(ref callback) => callback(&err),
            None => eprintln!("[LOGGER ERROR] {}", err),
        }
    }

    pub fn flush(&self) -> Result<()> {
        self.inner.lock().sink.flush()
    }

    #[inline]
    #[track_caller]
    pub fn trace(&self, message: impl fmt::Display) {
        self.output(LogLevel::Trace, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.output(LogLevel::Debug, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.output(LogLevel::Info, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.output(LogLevel::Warn, format_args!("{}", message));
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.output(LogLevel::Error, format_args!("{}", message));
    }

    /// Log at Fatal and return. The process keeps running.
    #[inline]
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.output(LogLevel::Fatal, format_args!("{}", message));
    }

    /// Create a new builder for configuring a Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("flags", &self.flags)
            .field("sink", &self.sink_name())
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.inner.get_mut().sink.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
/// let logger = Logger::builder()
///     .level(LogLevel::Debug)
///     .flags(Flags::TIME | Flags::LEVEL)
///     .sink(StreamSink::stderr())
///     .on_error(|err| {
///         eprintln!("ALERT: {}", err);
///     })
///     .build();
/// ```
pub struct LoggerBuilder {
    level: LogLevel,
    flags: Flags,
    sink: Option<Box<dyn Sink>>,
    on_error: Option<ErrorCallback>,
}

impl LoggerBuilder {
    /// Threshold Info, all decorations, stdout
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            flags: Flags::all(),
            sink: None,
            on_error: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn flags(mut self, flags: Flags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the output sink. A later call replaces an earlier one.
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Receive sink and formatting failures instead of the default stderr report.
    #[must_use = "builder methods return a new value"]
    pub fn on_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&LoggerError) + Send + Sync + 'static,
    {
        self.on_error = Some(Arc::new(callback));
        self
    }

    pub fn build(self) -> Logger {
        let sink = self
            .sink
            .unwrap_or_else(|| Box::new(StreamSink::stdout()));
        Logger::from_parts(sink, self.flags, self.level, self.on_error)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Sink whose output stays readable after the logger takes ownership.
    #[derive(Clone, Default)]
    struct CaptureSink {
        out: Arc<Mutex<Vec<u8>>>,
        writes: Arc<AtomicUsize>,
    }

    impl CaptureSink {
        fn contents(&self) -> String {
            String::from_utf8(self.out.lock().clone()).unwrap()
        }
    }

    impl Sink for CaptureSink {
        fn write_line(&mut self, line: &[u8]) -> Result<()> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            self.out.lock().extend_from_slice(line);
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "capture"
        }
    }

    struct FailingSink;

    impl Sink for FailingSink {
        fn write_line(&mut self, _line: &[u8]) -> Result<()> {
            Err(LoggerError::sink("failing", "Simulated failure"))
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn write_line(&mut self, _line: &[u8]) -> Result<()> {
            panic!("sink exploded");
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    fn capture(flags: Flags) -> (Logger, CaptureSink) {
        let sink = CaptureSink::default();
        (Logger::new(sink.clone(), flags), sink)
    }

    #[test]
    fn test_default_threshold_is_info() {
        let (logger, sink) = capture(Flags::empty());
        assert_eq!(logger.level(), LogLevel::Info);

        logger.debug("hidden");
        logger.info("shown");
        assert_eq!(sink.contents(), "shown\n");
    }

    #[test]
    fn test_new_default_enables_all_flags() {
        let logger = Logger::new_default(CaptureSink::default());
        assert_eq!(logger.flags(), Flags::all());
    }

    #[test]
    fn test_level_only_line() {
        let (logger, sink) = capture(Flags::LEVEL);
        logger.warn(format_args!("disk at {}%", 91));
        assert_eq!(sink.contents(), "[Warn] disk at 91%\n");
    }

    #[test]
    fn test_below_threshold_writes_nothing() {
        let (logger, sink) = capture(Flags::all());
        logger.set_level(LogLevel::Error);
        logger.info("ignored");

        assert_eq!(sink.contents(), "");
        assert_eq!(sink.writes.load(Ordering::SeqCst), 0);
        assert_eq!(logger.metrics().filtered_count(), 1);
        assert_eq!(logger.metrics().lines_written(), 0);
    }

    /// Display impl that counts how often it is formatted.
    struct Counted(Arc<AtomicUsize>);

    impl fmt::Display for Counted {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, Ordering::SeqCst);
            f.write_str("counted")
        }
    }

    #[test]
    fn test_filtered_message_is_never_formatted() {
        let (logger, sink) = capture(Flags::all());
        let formatted = Arc::new(AtomicUsize::new(0));

        logger.debug(Counted(Arc::clone(&formatted)));
        crate::debug!(logger, "{} {}", Counted(Arc::clone(&formatted)), 1);
        logger.output(LogLevel::Trace, format_args!("{}", Counted(Arc::clone(&formatted))));

        assert_eq!(formatted.load(Ordering::SeqCst), 0);
        assert_eq!(sink.contents(), "");
        assert_eq!(logger.metrics().filtered_count(), 3);

        logger.info(Counted(Arc::clone(&formatted)));
        assert_eq!(formatted.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_panicking_message_does_not_leak_into_next_line() {
        struct Exploding;

        impl fmt::Display for Exploding {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("partial-")?;
                panic!("display exploded");
            }
        }

        let (logger, sink) = capture(Flags::LEVEL);
        let result = panic::catch_unwind(panic::AssertUnwindSafe(|| logger.error(Exploding)));
        assert!(result.is_err());

        logger.info("next");
        assert_eq!(sink.contents(), "[Info] next\n");
        assert_eq!(sink.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failing_message_is_reported_not_written() {
        struct Refusing;

        impl fmt::Display for Refusing {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("half")?;
                Err(fmt::Error)
            }
        }

        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let sink = CaptureSink::default();
        let logger = Logger::builder()
            .flags(Flags::LEVEL)
            .sink(sink.clone())
            .on_error(move |err| {
                seen_clone
                    .lock()
                    .push(matches!(err, LoggerError::FormatterError { .. }));
            })
            .build();

        logger.warn(Refusing);
        logger.info("after");

        assert_eq!(*seen.lock(), vec![true]);
        assert_eq!(sink.contents(), "[Info] after\n");
        assert_eq!(logger.metrics().write_failures(), 1);
        assert_eq!(logger.metrics().lines_written(), 1);
    }

    #[test]
    fn test_trailing_newline_not_doubled() {
        let (logger, sink) = capture(Flags::empty());
        logger.info("done\n");
        assert_eq!(sink.contents(), "done\n");
    }

    #[test]
    fn test_empty_message_gets_newline() {
        let (logger, sink) = capture(Flags::LEVEL);
        logger.info("");
        assert_eq!(sink.contents(), "[Info] \n");

        let (logger, sink) = capture(Flags::empty());
        logger.info("");
        assert_eq!(sink.contents(), "\n");
    }

    #[test]
    fn test_caller_location_is_call_site() {
        let (logger, sink) = capture(Flags::FILE);
        logger.info("here");
        let line = line!() - 1;
        assert_eq!(sink.contents(), format!("logger.rs:{} here\n", line));
    }

    #[test]
    fn test_unknown_location_placeholder() {
        let (logger, sink) = capture(Flags::FILE | Flags::LEVEL);
        logger.output_at(None, LogLevel::Error, format_args!("lost"));
        assert_eq!(sink.contents(), "???:0 [Error] lost\n");
    }

    #[test]
    fn test_explicit_location_basename() {
        let (logger, sink) = capture(Flags::FILE);
        let location = SourceLocation::new("src/net/server.rs", 17);
        logger.output_at(Some(location), LogLevel::Info, format_args!("bound"));

        let windows = SourceLocation::new(r"C:\work\src\main.rs", 3);
        logger.output_at(Some(windows), LogLevel::Info, format_args!("started"));

        assert_eq!(sink.contents(), "server.rs:17 bound\nmain.rs:3 started\n");
    }

    #[test]
    fn test_decoration_order() {
        let (logger, sink) = capture(Flags::all());
        logger.error("boom");

        let out = sink.contents();
        // [YYYY/MM/DD hh:mm:ss] logger.rs:N [Error] boom
        assert!(out.starts_with('['));
        assert_eq!(&out[20..22], "] ");
        let rest = &out[22..];
        assert!(rest.starts_with("logger.rs:"), "got {:?}", out);
        assert!(rest.ends_with(" [Error] boom\n"), "got {:?}", out);
    }

    #[test]
    fn test_one_write_per_line() {
        let (logger, sink) = capture(Flags::all());
        logger.info("a");
        logger.warn("b");
        assert_eq!(sink.writes.load(Ordering::SeqCst), 2);
        assert_eq!(logger.metrics().lines_written(), 2);
    }

    #[test]
    fn test_fatal_returns_to_caller() {
        let (logger, sink) = capture(Flags::LEVEL);
        logger.fatal("x");
        let still_running = true;

        assert!(still_running);
        assert_eq!(sink.contents(), "[Fatal] x\n");
    }

    #[test]
    fn test_set_level_applies_to_later_calls() {
        let (logger, sink) = capture(Flags::empty());
        logger.trace("before");
        logger.set_level(LogLevel::Trace);
        logger.trace("after");

        assert_eq!(sink.contents(), "after\n");
        assert!(logger.enabled(LogLevel::Trace));
    }

    #[test]
    fn test_sink_error_goes_to_hook() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);

        let logger = Logger::builder()
            .sink(FailingSink)
            .on_error(move |err| {
                seen_clone.lock().push(err.to_string());
            })
            .build();

        logger.info("one");
        logger.error("two");

        assert_eq!(logger.metrics().write_failures(), 2);
        assert_eq!(seen.lock().len(), 2);
        assert!(seen.lock()[0].contains("Simulated failure"));
    }

    #[test]
    fn test_sink_panic_is_contained() {
        let panics = Arc::new(AtomicUsize::new(0));
        let panics_clone = Arc::clone(&panics);

        let logger = Logger::builder()
            .sink(PanickingSink)
            .on_error(move |err| {
                if matches!(err, LoggerError::SinkPanicked { .. }) {
                    panics_clone.fetch_add(1, Ordering::SeqCst);
                }
            })
            .build();

        logger.info("first");
        logger.info("second");

        assert_eq!(panics.load(Ordering::SeqCst), 2);
        assert_eq!(logger.metrics().write_failures(), 2);
    }

    #[test]
    fn test_hook_may_log_through_same_logger() {
        let sink = CaptureSink::default();
        let logger = Arc::new(Logger::new(sink.clone(), Flags::empty()));
        let weak = Arc::downgrade(&logger);

        let failing = Logger::builder()
            .flags(Flags::empty())
            .sink(FailingSink)
            .on_error(move |err| {
                if let Some(logger) = weak.upgrade() {
                    logger.error(err);
                }
            })
            .build();

        failing.info("lost");
        assert_eq!(sink.contents(), "Sink 'failing' failed: Simulated failure\n");
    }

    #[test]
    fn test_builder_defaults() {
        let builder = LoggerBuilder::default();
        let logger = builder.sink(CaptureSink::default()).build();

        assert_eq!(logger.level(), LogLevel::Info);
        assert_eq!(logger.flags(), Flags::all());
        assert_eq!(logger.sink_name(), "capture");
    }

    #[test]
    fn test_builder_without_sink_uses_stdout() {
        let logger = Logger::builder().level(LogLevel::Fatal).build();
        assert_eq!(logger.sink_name(), "stdout");
    }

    #[test]
    fn test_boxed_sink() {
        let sink = CaptureSink::default();
        let boxed: Box<dyn Sink> = Box::new(sink.clone());
        let logger = Logger::new(boxed, Flags::LEVEL);
        logger.info("boxed");
        assert_eq!(sink.contents(), "[Info] boxed\n");
    }
}
