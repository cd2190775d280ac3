//! File logging example
//!
//! Demonstrates fanning every record out to the console and a file.
//!
//! Run with: cargo run --example file_logging

use fanout_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Fanout Logger - File Logging Example ===\n");

    let logger = Logger::builder()
        .appender(ConsoleAppender::stdout())
        .appender(FileAppender::new("application.log")?)
        .serializer(Serializer::single_line())
        .base_option(with_timestamp())
        .base_option(with_data("service", "demo"))
        .build()?;

    println!("1. Logging to both console and file:");

    logger.info("Application started")?;
    logger.debug("Loading configuration...")?;
    logger.warn("Using default settings for some options")?;
    logger.error("Failed to load optional plugin")?;

    println!("\n2. Performing some operations:");

    for i in 1..=5 {
        let bytes = logger.log_with(
            LogLevel::Info,
            format!("Processing item {}/5", i),
            [with_data("item", i)],
        )?;
        if i == 3 {
            logger.warn(format!("Item 3 took longer than expected ({} bytes logged)", bytes))?;
        }
    }

    logger.info("All operations completed")?;
    logger.flush()?;

    let metrics = logger.metrics();
    println!(
        "\nLogged {} records, {} bytes across {:?}",
        metrics.total_logged(),
        metrics.bytes_written(),
        logger.appender_names()
    );

    println!("\n=== Example completed successfully! ===");
    println!("Check 'application.log' for the full log output");

    Ok(())
}
