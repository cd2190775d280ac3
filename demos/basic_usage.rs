//! Basic logger usage example
//!
//! Demonstrates a console logger, the level helpers, data fields and the
//! logging macros.
//!
//! Run with: cargo run --example basic_usage

use fanout_logger::prelude::*;
use fanout_logger::{info, warn};

fn main() -> Result<()> {
    println!("=== Fanout Logger - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .appender(ConsoleAppender::stdout())
        .serializer(Serializer::SingleLine(SingleLineFormat {
            timestamp_format: TimestampFormat::Iso8601,
            use_colors: true,
        }))
        .base_option(with_timestamp())
        .build()?;

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message")?;
    logger.info("This is an info message")?;
    logger.warn("This is a warning message")?;
    logger.error("This is an error message")?;

    println!("\n2. Attaching data:");
    logger.log_with(
        LogLevel::Info,
        "User logged in",
        [with_data("user_id", 42), with_data("method", "password")],
    )?;

    println!("\n3. Using macros:");
    let port = 8080;
    info!(logger, "Server listening on port {}", port)?;
    warn!(logger, "Cache miss rate high"; "rate" => 0.42, "window_s" => 60)?;

    println!("\n4. Recording the call site:");
    logger.log(LogRecord::new("Where am I?", [with_level(LogLevel::Debug), with_source()]))?;

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
