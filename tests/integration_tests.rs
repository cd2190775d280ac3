//! Integration tests for the logger system
//!
//! These tests verify:
//! - Fan-out delivery with a failing appender
//! - Canonical JSON layout and parse-back
//! - Source location offsets
//! - Timestamped JSON log files
//! - Filesystem snapshots

use fanout_logger::appenders::{Appender, FileAppender, MemoryAppender, Written};
use fanout_logger::core::error::{LoggerError, Result};
use fanout_logger::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Appender that refuses every write
struct AlwaysFailing;

impl Appender for AlwaysFailing {
    fn append(&mut self, _buf: &[u8]) -> Written {
        Written::partial(0, LoggerError::other("stub: write refused"))
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "always-failing"
    }
}

#[test]
fn test_failing_appender_does_not_block_others() {
    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .appender(AlwaysFailing)
        .build()
        .expect("Failed to build logger");

    let err = logger.log(LogRecord::new("hey", [])).unwrap_err();

    assert_eq!(err.to_string(), "stub: write refused");
    assert_eq!(err.failures().len(), 1);
    assert_eq!(buffer.contents_string(), "{\n\t\"message\": \"hey\"\n}\n");
}

#[test]
fn test_failing_appender_first_in_order() {
    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(AlwaysFailing)
        .appender(buffer.clone())
        .appender(AlwaysFailing)
        .build()
        .expect("Failed to build logger");

    let err = logger.info("still delivered").unwrap_err();

    assert_eq!(err.to_string(), "stub: write refused, stub: write refused");
    assert!(buffer.contents_string().contains("still delivered"));
    assert_eq!(logger.metrics().write_failures(), 1);
    assert_eq!(logger.metrics().total_failed(), 1);
}

#[test]
fn test_json_parses_back() {
    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .build()
        .expect("Failed to build logger");

    logger
        .log(LogRecord::new("m", [with_level(LogLevel::Info), with_data("k", "v")]))
        .expect("Failed to log");

    let output = buffer.contents_string();
    let value: serde_json::Value = serde_json::from_str(output.trim_end()).expect("valid JSON");
    assert_eq!(value["level"], "INFO");
    assert_eq!(value["message"], "m");
    assert_eq!(value["data"]["k"], "v");

    let record = LogRecord::from_json(output.trim_end()).expect("record layout");
    assert_eq!(record.message(), "m");
    assert_eq!(record.get("k"), Some(&FieldValue::from("v")));
}

#[inline(never)]
fn emit_from_checkout() -> LogRecord {
    LogRecord::new("where am i", [with_source_location("here", 0), with_source_location("above", 1)])
}

#[test]
fn test_source_location_offsets() {
    let record = emit_from_checkout();

    let here = record.get("here").and_then(FieldValue::as_str).expect("offset 0 resolved");
    assert!(here.contains("emit_from_checkout"), "unexpected location {}", here);
    assert!(here.contains("integration_tests.rs:"), "unexpected location {}", here);

    let above = record.get("above").and_then(FieldValue::as_str).expect("offset 1 resolved");
    assert!(above.contains("test_source_location_offsets"), "unexpected location {}", above);
}

#[test]
fn test_source_location_past_stack_is_omitted() {
    let record = LogRecord::new("deep", [with_source_location("src", 100_000)]);
    assert!(record.get("src").is_none());
}

#[inline(never)]
fn handle_request(logger: &Logger) {
    logger.info("request handled").expect("Failed to log");
}

#[test]
fn test_source_base_option_points_at_log_caller() {
    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .base_option(with_source())
        .build()
        .expect("Failed to build logger");

    handle_request(&logger);

    let record = LogRecord::from_json(buffer.contents_string().trim_end()).expect("record");
    let function = record.get("src_function").and_then(FieldValue::as_str).expect("function");
    assert!(function.contains("handle_request"), "unexpected function {}", function);
    let file_line = record.get("src_file_line").and_then(FieldValue::as_str).expect("file:line");
    assert!(file_line.contains("integration_tests.rs:"), "unexpected location {}", file_line);
}

#[test]
fn test_json_file_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_dir = temp_dir.path().join("logs");

    let logger = Logger::json_file(&log_dir).expect("Failed to create logger");
    assert_eq!(logger.attempts(), fanout_logger::JSON_FILE_ATTEMPTS);

    for i in 0..3 {
        logger
            .log(LogRecord::new(format!("Message {}", i), [with_data("i", i)]))
            .expect("Failed to log");
    }
    logger.flush().expect("Failed to flush");

    let files: Vec<_> = fs::read_dir(&log_dir)
        .expect("log dir exists")
        .map(|e| e.expect("dir entry").file_name().into_string().expect("utf-8 name"))
        .collect();
    assert_eq!(files.len(), 1);
    assert!(files[0].starts_with("logs.") && files[0].ends_with(".txt"));

    let content = fs::read_to_string(log_dir.join(&files[0])).expect("Failed to read log file");
    let array = format!("[{}]", content.trim_end().trim_end_matches(','));
    let records: Vec<LogRecord> = serde_json::from_str(&array).expect("comma separated records");
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].message(), "Message 2");
    assert_eq!(records[2].get("i"), Some(&FieldValue::Int(2)));
}

#[test]
fn test_multiple_file_appenders() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file1 = temp_dir.path().join("multi1.log");
    let log_file2 = temp_dir.path().join("multi2.log");

    let logger = Logger::builder()
        .appender(FileAppender::new(&log_file1).expect("Failed to create appender"))
        .appender(FileAppender::new(&log_file2).expect("Failed to create appender"))
        .serializer(Serializer::single_line())
        .build()
        .expect("Failed to build logger");

    let bytes = logger.info("Test message").expect("Failed to log");

    let content1 = fs::read_to_string(&log_file1).expect("Failed to read log file 1");
    let content2 = fs::read_to_string(&log_file2).expect("Failed to read log file 2");
    assert_eq!(content1, "[INFO] \"Test message\" {}\n");
    assert_eq!(content1, content2);
    assert_eq!(bytes, content1.len() * 2);
    assert_eq!(logger.appender_names(), ["file", "file"]);
}

#[test]
fn test_fs_snapshot_through_logger() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    fs::write(temp_dir.path().join("config.toml"), "port = 1").expect("write file");

    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .build()
        .expect("Failed to build logger");

    logger
        .log_with(LogLevel::Debug, "startup", [with_fs_snapshot("fsys", temp_dir.path())])
        .expect("Failed to log");

    let value: serde_json::Value =
        serde_json::from_str(buffer.contents_string().trim_end()).expect("valid JSON");
    assert_eq!(value["data"]["fsys"]["files"][0]["path"], "config.toml");
    assert_eq!(value["data"]["fsys"]["files"][0]["size"], 8);
    assert!(value["data"]["fsys"].get("error").is_none());
}

#[test]
fn test_unrepresentable_value_is_reported() {
    use std::collections::HashMap;

    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .attempts(2)
        .build()
        .expect("Failed to build logger");

    let mut by_tuple = HashMap::new();
    by_tuple.insert((1, 2), "tuple keys are not JSON object keys");

    let err = logger
        .log(LogRecord::new("bad data", [with_serialized("map", &by_tuple)]))
        .unwrap_err();

    assert!(matches!(err, LoggerError::JsonError(_)));
    assert!(buffer.contents().is_empty());
    assert_eq!(logger.metrics().serialization_failures(), 2);
}

#[test]
fn test_serialized_nan_is_reported() {
    #[derive(serde::Serialize)]
    struct Stats {
        hits: u32,
        ratio: f64,
    }

    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .build()
        .expect("Failed to build logger");

    let err = logger
        .log(LogRecord::new("stats", [with_serialized("stats", &Stats { hits: 0, ratio: f64::NAN })]))
        .unwrap_err();

    assert!(matches!(err, LoggerError::JsonError(_)));
    assert!(buffer.contents().is_empty());
}

#[test]
fn test_single_line_with_prefix_and_timestamp() {
    let buffer = MemoryAppender::new();
    let logger = Logger::builder()
        .appender(buffer.clone())
        .serializer(Serializer::SingleLine(SingleLineFormat {
            timestamp_format: TimestampFormat::UnixMillis,
            use_colors: false,
        }))
        .base_option(with_timestamp())
        .prefix("svc ")
        .build()
        .expect("Failed to build logger");

    logger.warn("disk almost full").expect("Failed to log");

    let line = buffer.contents_string();
    let millis = line
        .strip_prefix("svc [")
        .and_then(|rest| rest.split(']').next())
        .expect("timestamp in brackets");
    let millis: i64 = millis.parse().expect("numeric timestamp");
    assert!(millis > 1_000_000_000_000);
    assert!(line.ends_with("[WARN] \"disk almost full\" {}\n"));
}
