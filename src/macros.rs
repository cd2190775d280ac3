//! Logging macros for ergonomic record construction.
//!
//! These macros format the message like `format!` and can attach data
//! fields after a `;` as `key => value` pairs. They return the logger's
//! `Result<usize>`.
//!
//! # Examples
//!
//! ```
//! use fanout_logger::prelude::*;
//! use fanout_logger::info;
//!
//! let logger = Logger::builder().appender(MemoryAppender::new()).build().unwrap();
//!
//! // Basic logging
//! info!(logger, "Server started").unwrap();
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port).unwrap();
//!
//! // With data fields
//! info!(logger, "User logged in"; "user_id" => 42, "method" => "password").unwrap();
//! ```

/// Log a message at the given level.
///
/// # Examples
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use fanout_logger::log;
/// log!(logger, LogLevel::Info, "Simple message").unwrap();
/// log!(logger, LogLevel::Error, "Error code: {}", 500; "retryable" => false).unwrap();
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* $(; $($key:expr => $value:expr),+ $(,)?)?) => {
        $logger.log_with(
            $level,
            format!($fmt $(, $arg)*),
            ::std::vec![$($($crate::with_data($key, $value)),+)?],
        )
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use fanout_logger::info;
/// info!(logger, "Application started").unwrap();
/// info!(logger, "Processing {} items", 100).unwrap();
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use fanout_logger::prelude::*;
/// # let logger = Logger::builder().build().unwrap();
/// use fanout_logger::error;
/// error!(logger, "Failed to connect to database"; "attempt" => 3).unwrap();
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::appenders::MemoryAppender;
    use crate::core::{FieldValue, LogLevel, LogRecord, Logger};

    fn capture() -> (Logger, MemoryAppender) {
        let memory = MemoryAppender::new();
        let logger = Logger::builder().appender(memory.clone()).suffix(",").build().unwrap();
        (logger, memory)
    }

    fn records(memory: &MemoryAppender) -> Vec<LogRecord> {
        let text = memory.contents_string();
        let array = format!("[{}]", text.trim_end().trim_end_matches(','));
        serde_json::from_str(&array).unwrap()
    }

    #[test]
    fn test_log_macro() {
        let (logger, memory) = capture();
        log!(logger, LogLevel::Info, "Test message").unwrap();
        log!(logger, LogLevel::Warn, "Formatted: {}", 42).unwrap();

        let records = records(&memory);
        assert_eq!(records[0].message(), "Test message");
        assert_eq!(records[1].message(), "Formatted: 42");
        assert_eq!(records[1].level(), Some(LogLevel::Warn));
    }

    #[test]
    fn test_level_macros() {
        let (logger, memory) = capture();
        debug!(logger, "Count: {}", 5).unwrap();
        info!(logger, "Items: {}", 100).unwrap();
        warn!(logger, "Retry {} of {}", 1, 3).unwrap();
        error!(logger, "Code: {}", 500).unwrap();

        let levels: Vec<_> = records(&memory).iter().map(LogRecord::level).collect();
        assert_eq!(
            levels,
            [Some(LogLevel::Debug), Some(LogLevel::Info), Some(LogLevel::Warn), Some(LogLevel::Error)]
        );
    }

    #[test]
    fn test_data_pairs() {
        let (logger, memory) = capture();
        let user = "alice";
        info!(logger, "login by {}", user; "user" => user, "attempt" => 2).unwrap();

        let record = &records(&memory)[0];
        assert_eq!(record.message(), "login by alice");
        assert_eq!(record.get("user"), Some(&FieldValue::from("alice")));
        assert_eq!(record.get("attempt"), Some(&FieldValue::Int(2)));
    }
}
