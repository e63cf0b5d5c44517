//! Basic logger usage example
//!
//! Demonstrates levels, chained fields, both formatters, and panic recovery.
//!
//! Run with: cargo run --example basic_usage

use rust_structured_log::prelude::*;
use rust_structured_log::{fields, info, warn};

fn main() -> Result<()> {
    println!("=== Rust Structured Log - Basic Usage Example ===\n");

    let logger = Logger::builder()
        .level(LogLevel::Trace)
        .appender(ConsoleAppender::stdout())
        .build();

    println!("1. Logging at different levels:");
    logger.trace("Went to the beach");
    logger.debug("Started observing beach");
    logger.info("A group of walrus emerges from the ocean");
    logger.warn("The group's number increased tremendously!");
    logger.error("The ice breaks!");

    println!("\n2. Chained fields:");
    let walrus = logger.with_fields(fields! { "animal" => "walrus", "size" => 10 });
    walrus.info("A walrus appears");
    walrus.with_field("omg", true).warn("It is getting bigger");
    info!(logger.with_field("port", 8080), "Listening on {}", "0.0.0.0");

    println!("\n3. Raising the threshold to Warn:");
    logger.set_level(LogLevel::Warn);
    logger.info("Info message (hidden)");
    warn!(logger, "Warning message (visible)");

    println!("\n4. JSON output with caller reporting:");
    logger.set_formatter(JsonFormatter::new());
    logger.set_report_caller(true);
    logger.with_field("user", "alice").error("Login failed");
    logger.set_report_caller(false);

    println!("\n5. Recovering from a panic-level record:");
    let caught = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
        logger.with_field("size", 9009).panic("It's over 9000!");
    }));
    if let Err(payload) = caught {
        if let Some(entry) = LogEntry::from_panic_payload(payload.as_ref()) {
            println!("   recovered: {} ({} fields)", entry.message, entry.fields.len());
        }
    }

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
