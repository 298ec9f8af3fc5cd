//! Main logger implementation

use super::{
    appender::{shared, Appender, SharedAppender},
    config::{LoggerConfig, Output},
    error::Result,
    log_entry::{CallSite, Log},
    metrics::LoggerMetrics,
    output_format::OutputFormat,
    status_error::StatusError,
    status_map::StatusMap,
};
use crate::appenders::{router, ConsoleAppender};
use std::sync::Arc;
use std::time::Duration;

/// Status used by [`Logger::info`]
pub const INFO_STATUS: u16 = 200;

/// Status used by [`Logger::fatal`] before the process exits
pub const FATAL_STATUS: u16 = 501;

/// Status-driven logger.
///
/// Every call builds one immutable [`Log`]; records whose status reaches the
/// configured level are rendered and handed to this logger's own sink.
/// Cloning is cheap and clones share config, sink and metrics.
#[derive(Clone)]
pub struct Logger {
    config: Arc<LoggerConfig>,
    sink: SharedAppender,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Create a logger writing to the sink named by `config.output`
    ///
    /// # Errors
    ///
    /// Returns error if a file output cannot be opened
    pub fn new(config: LoggerConfig) -> Result<Self> {
        let config = config.normalized();
        let sink = router::open(&config.output)?;
        Ok(Self::with_appender(config, Arc::new(parking_lot::Mutex::new(sink))))
    }

    /// Create a logger writing to an explicitly supplied sink.
    ///
    /// `config.output` is ignored; the sink decides where text goes.
    pub fn with_appender(config: LoggerConfig, sink: SharedAppender) -> Self {
        Self {
            config: Arc::new(config.normalized()),
            sink,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Handle to this logger's sink, for wiring another logger to it
    pub fn sink(&self) -> SharedAppender {
        Arc::clone(&self.sink)
    }

    /// Build a record attributed to the caller and write it if it passes the level
    #[track_caller]
    pub fn log_f(&self, status: u16, message: impl Into<String>) -> Log {
        self.log_at(CallSite::caller(), status, message)
    }

    /// Same as [`log_f`](Self::log_f) with an explicit source location
    pub fn log_at(&self, site: CallSite, status: u16, message: impl Into<String>) -> Log {
        let log = Log::new(status, message, site);
        self.emit(&log);
        log
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) -> Log {
        self.log_at(CallSite::caller(), INFO_STATUS, message)
    }

    /// Log with an explicit status and return the redacted projection
    #[track_caller]
    pub fn error_f(&self, status: u16, message: impl Into<String>) -> StatusError {
        self.error_at(CallSite::caller(), status, message)
    }

    pub fn error_at(&self, site: CallSite, status: u16, message: impl Into<String>) -> StatusError {
        let log = self.log_at(site, status, message);
        StatusError::from_log(&log, status)
    }

    /// Log with the status the status map assigns to the message (500 if none)
    #[track_caller]
    pub fn error_mapped(&self, message: impl Into<String>) -> StatusError {
        self.error_mapped_at(CallSite::caller(), message)
    }

    pub fn error_mapped_at(&self, site: CallSite, message: impl Into<String>) -> StatusError {
        let message = message.into();
        let status = self.config.status_map.status_for(&message);
        self.error_at(site, status, message)
    }

    /// Log at 501 and terminate the process with exit code 1
    #[track_caller]
    pub fn fatal(&self, message: impl Into<String>) -> ! {
        self.log_at(CallSite::caller(), FATAL_STATUS, message);
        if let Err(e) = self.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush before exit: {}", e);
        }
        std::process::exit(1)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }

    fn emit(&self, log: &Log) {
        if log.status() < self.config.level {
            self.metrics.record_filtered();
            return;
        }

        let line = self.config.format.render(log);
        let mut sink = self.sink.lock();

        // A panicking sink must not take the caller down with it
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| sink.append(&line)));

        match result {
            Ok(Ok(())) => {
                self.metrics.record_written();
            }
            Ok(Err(e)) => {
                eprintln!("[LOGGER ERROR] Appender '{}' failed: {}", sink.name(), e);
                self.metrics.record_dropped();
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!("[LOGGER CRITICAL] Appender '{}' panicked: {}", sink.name(), panic_msg);
                self.metrics.record_dropped();
            }
        }
    }
}

impl Default for Logger {
    /// JSON to stdout with the default thresholds
    fn default() -> Self {
        Self::with_appender(LoggerConfig::default(), shared(ConsoleAppender::new()))
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_status_logger::prelude::*;
/// use std::time::Duration;
///
/// let logger = Logger::builder()
///     .format("text")
///     .level(200)
///     .output("none")
///     .retries(3)
///     .wait(Duration::from_millis(100))
///     .status(404, ["not found"])
///     .build()
///     .unwrap();
///
/// let err = logger.error_mapped("user 7 not found");
/// assert_eq!(err.status(), 404);
/// ```
pub struct LoggerBuilder {
    config: LoggerConfig,
    sink: Option<SharedAppender>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            config: LoggerConfig::default(),
            sink: None,
        }
    }

    /// Start from an existing configuration
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: LoggerConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: impl Into<OutputFormat>) -> Self {
        self.config.format = format.into();
        self
    }

    /// Inclusive status threshold for writing
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: u16) -> Self {
        self.config.level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, output: impl Into<Output>) -> Self {
        self.config.output = output.into();
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn retries(mut self, retries: usize) -> Self {
        self.config.retries = retries;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn wait(mut self, wait: Duration) -> Self {
        self.config.wait = wait;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn status_map(mut self, status_map: StatusMap) -> Self {
        self.config.status_map = status_map;
        self
    }

    /// Register substrings that reclassify a message to `status`
    #[must_use = "builder methods return a new value"]
    pub fn status<I, S>(mut self, status: u16, needles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.status_map.insert(status, needles);
        self
    }

    /// Write through `appender` instead of the configured output
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.sink = Some(shared(appender));
        self
    }

    /// Write through a sink shared with other loggers
    #[must_use = "builder methods return a new value"]
    pub fn shared_appender(mut self, sink: SharedAppender) -> Self {
        self.sink = Some(sink);
        self
    }

    /// # Errors
    ///
    /// Returns error if a file output cannot be opened
    pub fn build(self) -> Result<Logger> {
        match self.sink {
            Some(sink) => Ok(Logger::with_appender(self.config, sink)),
            None => Logger::new(self.config),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}
