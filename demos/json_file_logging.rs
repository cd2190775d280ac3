//! JSON file logging example
//!
//! Writes JSON records to a timestamped file in a log directory, then
//! reads them back.
//!
//! Run with: cargo run --example json_file_logging

use fanout_logger::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== Fanout Logger - JSON File Logging Example ===\n");

    let log_dir = std::env::temp_dir().join("fanout_logger_demo");
    let logger = Logger::json_file(&log_dir)?;

    logger.log(LogRecord::new(
        "Service starting",
        [
            with_timestamp(),
            with_level(LogLevel::Info),
            with_source(),
            with_fs_snapshot("workdir", "."),
        ],
    ))?;

    for attempt in 1..=3 {
        logger.log_with(
            LogLevel::Warn,
            "Upstream slow",
            [with_timestamp(), with_data("attempt", attempt)],
        )?;
    }
    logger.flush()?;

    // Records are separated by ",\n", so wrapping the file in brackets gives a JSON array
    for entry in fs::read_dir(&log_dir)? {
        let path = entry?.path();
        let content = fs::read_to_string(&path)?;
        let array = format!("[{}]", content.trim_end().trim_end_matches(','));
        let records: Vec<LogRecord> = serde_json::from_str(&array)?;
        println!("{}: {} records", path.display(), records.len());
    }

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
