//! Core logger types and traits

pub mod appender;
pub mod error;
pub mod fanout;
pub mod field_value;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod options;
pub mod serializer;
pub mod timestamp;
mod value_serializer;

pub use appender::{Appender, Written};
pub use error::{LoggerError, Result};
pub use fanout::Fanout;
pub use field_value::FieldValue;
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{Logger, LoggerBuilder, DEFAULT_ATTEMPTS, JSON_FILE_ATTEMPTS};
pub use metrics::LoggerMetrics;
pub use options::{
    with_data, with_fs_snapshot, with_level, with_serialized, with_source,
    with_source_location, with_timestamp, LogOption, SRC_FILE_LINE_KEY, SRC_FUNCTION_KEY,
};
pub use serializer::{Serializer, SingleLineFormat};
pub use timestamp::TimestampFormat;
