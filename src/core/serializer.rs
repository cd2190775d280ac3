//! Record serializers
//!
//! A serializer turns a [`LogRecord`] into the bytes handed to the sinks:
//! - Json: tab-indented JSON in the canonical layout (machine-readable)
//! - SingleLine: one human-readable line for terminals

use super::error::Result;
use super::log_record::LogRecord;
use super::timestamp::TimestampFormat;
use serde::Serialize;

/// Options for [`Serializer::SingleLine`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SingleLineFormat {
    pub timestamp_format: TimestampFormat,
    /// Color the level label (requires the `console` feature)
    pub use_colors: bool,
}

impl Default for SingleLineFormat {
    fn default() -> Self {
        Self {
            timestamp_format: TimestampFormat::default(),
            use_colors: false,
        }
    }
}

/// Conversion from a record to bytes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Serializer {
    /// Pretty JSON, tab-indented
    ///
    /// Example:
    /// ```text
    /// {
    ///     "created_at": "2025-01-08T10:30:45.123456Z",
    ///     "level": "INFO",
    ///     "message": "Request processed",
    ///     "data": {
    ///         "status": 200
    ///     }
    /// }
    /// ```
    #[default]
    Json,

    /// Single line for terminals, not meant to be parsed back
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO] "Request processed" {"status": 200}`
    SingleLine(SingleLineFormat),
}

impl Serializer {
    /// Single-line serializer with default options
    #[must_use]
    pub fn single_line() -> Self {
        Serializer::SingleLine(SingleLineFormat::default())
    }

    /// Serialize `record` without modifying it.
    ///
    /// JSON fails when a data value cannot be represented (for example a
    /// non-finite float); the single-line form never fails.
    pub fn serialize(&self, record: &LogRecord) -> Result<Vec<u8>> {
        match self {
            Serializer::Json => to_json_pretty(record),
            Serializer::SingleLine(format) => Ok(to_single_line(record, format).into_bytes()),
        }
    }
}

fn to_json_pretty(record: &LogRecord) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    record.serialize(&mut ser)?;
    Ok(buf)
}

fn to_single_line(record: &LogRecord, format: &SingleLineFormat) -> String {
    let mut line = String::new();

    if let Some(created_at) = record.created_at() {
        line.push_str(&format!("[{}] ", format.timestamp_format.format(&created_at)));
    }
    if let Some(level) = record.level() {
        line.push_str(&format!("[{}] ", level_label(level, format.use_colors)));
    }

    line.push_str(&format!("{:?} {:?}", record.message(), record.data()));
    line
}

#[cfg(feature = "console")]
fn level_label(level: super::log_level::LogLevel, use_colors: bool) -> String {
    use colored::Colorize;
    if use_colors {
        level.to_str().color(level.color_code()).to_string()
    } else {
        level.to_str().to_string()
    }
}

#[cfg(not(feature = "console"))]
fn level_label(level: super::log_level::LogLevel, _use_colors: bool) -> String {
    level.to_str().to_string()
}
