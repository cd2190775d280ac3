//! Main logger implementation

use super::{
    appender::Appender,
    error::{LoggerError, Result},
    fanout::Fanout,
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    options::{with_level, LogOption},
    serializer::Serializer,
};
use crate::appenders::FileAppender;
use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;
use std::path::Path;

/// Attempts per record unless configured otherwise
pub const DEFAULT_ATTEMPTS: usize = 1;

/// Attempts used by [`Logger::json_file`]
pub const JSON_FILE_ATTEMPTS: usize = 5;

/// Synchronous structured logger.
///
/// Each [`log`](Logger::log) call applies the base options, serializes the
/// record, frames it as `prefix + record + suffix + "\n"` and writes it to
/// every appender. The whole sequence runs under one lock, so records from
/// concurrent callers never interleave. Share it between threads with `Arc`.
pub struct Logger {
    appenders: Mutex<Fanout>,
    serializer: Serializer,
    base_options: Vec<LogOption>,
    prefix: String,
    suffix: String,
    attempts: usize,
    /// Metrics for observability (records logged, failed attempts, bytes)
    metrics: LoggerMetrics,
}

impl Logger {
    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use fanout_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .appender(MemoryAppender::new())
    ///     .serializer(Serializer::single_line())
    ///     .base_option(with_timestamp())
    ///     .build()
    ///     .unwrap();
    ///
    /// logger.info("ready").unwrap();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Logger writing JSON records to a new `logs.<unix_seconds>.txt` in `dir`.
    ///
    /// The directory is created if needed. Records are separated by `",\n"`
    /// and each one gets [`JSON_FILE_ATTEMPTS`] attempts; the last error is
    /// returned if all of them fail.
    pub fn json_file(dir: impl AsRef<Path>) -> Result<Self> {
        Logger::builder()
            .appender(FileAppender::in_dir(dir)?)
            .serializer(Serializer::Json)
            .suffix(",")
            .attempts(JSON_FILE_ATTEMPTS)
            .build()
    }

    /// Finish `record` with the base options and write it to every appender.
    ///
    /// Returns the bytes accepted, summed over all appenders. If any
    /// appender fails, or the record cannot be serialized, the whole
    /// serialize-and-write step is retried up to the configured number of
    /// attempts and the last error is returned.
    #[track_caller]
    pub fn log(&self, mut record: LogRecord) -> Result<usize> {
        let call_site = Location::caller();
        let mut appenders = self.appenders.lock();

        for option in &self.base_options {
            record.apply(call_site, option);
        }

        let mut last_error = None;
        for attempt in 1..=self.attempts {
            if let Some(ref e) = last_error {
                self.metrics.record_retry();
                eprintln!(
                    "[LOGGER WARNING] Attempt {}/{} to log {:?} failed: {}. Retrying.",
                    attempt - 1,
                    self.attempts,
                    record.message(),
                    e
                );
            }

            match self.write_once(&mut appenders, &record) {
                Ok(bytes) => {
                    self.metrics.record_logged(bytes);
                    return Ok(bytes);
                }
                Err(e) => last_error = Some(e),
            }
        }

        self.metrics.record_failed();
        Err(last_error.unwrap_or_else(|| LoggerError::config("Logger", "no attempts configured")))
    }

    fn write_once(&self, appenders: &mut Fanout, record: &LogRecord) -> Result<usize> {
        let body = self.serializer.serialize(record).inspect_err(|_| {
            self.metrics.record_serialization_failure();
        })?;

        let mut framed =
            Vec::with_capacity(self.prefix.len() + body.len() + self.suffix.len() + 1);
        framed.extend_from_slice(self.prefix.as_bytes());
        framed.extend_from_slice(&body);
        framed.extend_from_slice(self.suffix.as_bytes());
        framed.push(b'\n');

        let written = appenders.write(&framed);
        if !written.is_ok() {
            self.metrics.record_write_failure();
            self.metrics.record_partial_bytes(written.bytes);
        }
        written.into_result()
    }

    /// Log `message` at `level`
    #[track_caller]
    pub fn log_message(&self, level: LogLevel, message: impl Into<String>) -> Result<usize> {
        self.log(LogRecord::new(message, [with_level(level)]))
    }

    /// Log `message` at `level` with extra per-record options
    #[track_caller]
    pub fn log_with<I>(&self, level: LogLevel, message: impl Into<String>, options: I) -> Result<usize>
    where
        I: IntoIterator<Item = LogOption>,
    {
        let options = std::iter::once(with_level(level)).chain(options);
        self.log(LogRecord::new(message, options))
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) -> Result<usize> {
        self.log_message(LogLevel::Debug, message)
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl Into<String>) -> Result<usize> {
        self.log_message(LogLevel::Info, message)
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) -> Result<usize> {
        self.log_message(LogLevel::Warn, message)
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl Into<String>) -> Result<usize> {
        self.log_message(LogLevel::Error, message)
    }

    #[inline]
    #[track_caller]
    pub fn panic(&self, message: impl Into<String>) -> Result<usize> {
        self.log_message(LogLevel::Panic, message)
    }

    pub fn flush(&self) -> Result<()> {
        self.appenders.lock().flush_all()
    }

    /// Get the logger metrics
    ///
    /// # Example
    ///
    /// ```
    /// use fanout_logger::prelude::*;
    ///
    /// let logger = Logger::builder().appender(MemoryAppender::new()).build().unwrap();
    /// logger.info("counted").unwrap();
    ///
    /// let metrics = logger.metrics();
    /// assert_eq!(metrics.total_logged(), 1);
    /// println!("Failure rate: {:.2}%", metrics.failure_rate());
    /// ```
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Names of the appenders, in write order
    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .lock()
            .names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn serializer(&self) -> &Serializer {
        &self.serializer
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let appenders: Vec<String> = match self.appenders.try_lock() {
            Some(fanout) => fanout.names().into_iter().map(String::from).collect(),
            None => vec!["<locked>".to_string()],
        };
        f.debug_struct("Logger")
            .field("appenders", &appenders)
            .field("serializer", &self.serializer)
            .field("base_options", &self.base_options.len())
            .field("prefix", &self.prefix)
            .field("suffix", &self.suffix)
            .field("attempts", &self.attempts)
            .finish()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.appenders.get_mut().flush_all() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failed = self.metrics.total_failed();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} undelivered records (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use fanout_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .appender(ConsoleAppender::stdout())
///     .serializer(Serializer::Json)
///     .base_option(with_timestamp())
///     .base_option(with_source())
///     .prefix("api ")
///     .suffix(",")
///     .attempts(3)
///     .build()
///     .unwrap();
/// ```
pub struct LoggerBuilder {
    appenders: Vec<Box<dyn Appender>>,
    serializer: Serializer,
    base_options: Vec<LogOption>,
    prefix: String,
    suffix: String,
    attempts: usize,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            appenders: Vec::new(),
            serializer: Serializer::default(),
            base_options: Vec::new(),
            prefix: String::new(),
            suffix: String::new(),
            attempts: DEFAULT_ATTEMPTS,
        }
    }

    /// Add an appender; appenders are written in the order they are added
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn serializer(mut self, serializer: Serializer) -> Self {
        self.serializer = serializer;
        self
    }

    /// Add an option applied to every record before serialization
    #[must_use = "builder methods return a new value"]
    pub fn base_option(mut self, option: LogOption) -> Self {
        self.base_options.push(option);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn base_options<I: IntoIterator<Item = LogOption>>(mut self, options: I) -> Self {
        self.base_options.extend(options);
        self
    }

    /// Literal text written before every record
    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Literal text written after every record, before the newline
    #[must_use = "builder methods return a new value"]
    pub fn suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Number of serialize-and-write attempts per record (at least 1)
    #[must_use = "builder methods return a new value"]
    pub fn attempts(mut self, attempts: usize) -> Self {
        self.attempts = attempts;
        self
    }

    /// Build the Logger
    pub fn build(self) -> Result<Logger> {
        if self.attempts == 0 {
            return Err(LoggerError::config("LoggerBuilder", "attempts must be at least 1"));
        }

        Ok(Logger {
            appenders: Mutex::new(Fanout::new(self.appenders)),
            serializer: self.serializer,
            base_options: self.base_options,
            prefix: self.prefix,
            suffix: self.suffix,
            attempts: self.attempts,
            metrics: LoggerMetrics::new(),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
