//! # Fanout Logger
//!
//! A small structured logging library. A [`LogRecord`] carries a message,
//! an optional timestamp and level, and free-form data added by
//! [`LogOption`]s. The [`Logger`] serializes each record (pretty JSON or a
//! single text line), frames it and writes it to every configured appender.
//!
//! ## Features
//!
//! - **Fan-out**: one record goes to every appender; a failing appender
//!   never stops delivery to the others, and all failures are reported
//!   together
//! - **Synchronous and ordered**: a single lock serializes writes, records
//!   never interleave
//! - **Construction-time options**: timestamp, level, source location,
//!   filesystem snapshot, arbitrary data
//! - **Bounded retries**: optional whole-record re-attempts that surface the
//!   last error

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    #[cfg(feature = "network")]
    pub use crate::appenders::NetworkAppender;
    pub use crate::appenders::{
        ConsoleAppender, ConsoleTarget, FileAppender, MemoryAppender, WriterAppender,
    };
    pub use crate::core::{
        with_data, with_fs_snapshot, with_level, with_serialized, with_source,
        with_source_location, with_timestamp, Appender, Fanout, FieldValue, LogLevel, LogOption,
        LogRecord, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result, Serializer,
        SingleLineFormat, TimestampFormat, Written,
    };
}

pub use crate::appenders::{ConsoleAppender, FileAppender, MemoryAppender};
pub use crate::core::{
    with_data, with_fs_snapshot, with_level, with_serialized, with_source, with_source_location,
    with_timestamp, Appender, Fanout, FieldValue, LogLevel, LogOption, LogRecord, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, Result, Serializer, SingleLineFormat,
    TimestampFormat, Written, DEFAULT_ATTEMPTS, JSON_FILE_ATTEMPTS,
};
