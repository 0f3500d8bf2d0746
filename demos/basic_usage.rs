//! Basic log handler usage example
//!
//! Demonstrates level filtering, screen tagging and structured records with
//! the console appender.
//!
//! Run with: cargo run --example basic_usage

use policy_engine_logger::prelude::*;
use policy_engine_logger::{info, warning};

fn main() -> Result<()> {
    println!("=== Policy Engine Logger - Basic Usage Example ===\n");

    let handler = LogHandler::builder()
        .debug_mode(true)
        .appender(ConsoleAppender::new())
        .build();

    println!("1. Logging at different levels:");
    handler.debug("This is a debug message");
    handler.info("This is an info message");
    handler.warning("This is a warning message");
    handler.error("This is an error message");

    println!("\n2. Raising the minimum level:");
    handler.set_min_level(LogLevel::Warning);
    println!("   Minimum level set to WARNING - debug and info won't show:");
    handler.debug("Debug message (hidden)");
    handler.info("Info message (hidden)");
    handler.warning("Warning message (visible)");

    println!("\n3. Screen tags:");
    handler.reset();
    handler.set_debug_mode(true);
    handler.set_screen("Checkout");
    info!(handler, "Cart has {} items", 3);
    handler.set_screen_tag("Checkout", "PAY");
    warning!(handler, "Card declined, retry {}", 1);

    println!("\n4. Structured fields:");
    handler
        .error_builder()
        .message("Policy evaluation failed")
        .field("policy_id", "export.allowed_formats")
        .field("attempt", 2)
        .error("unknown format 'xls'")
        .log();

    println!("\n5. Configuration from JSON:");
    let options = LoggerOptions::from_json(
        r#"{"tag": "Sync", "isDebugMode": true, "minLogLevel": "info", "useStructuredLogging": false}"#,
    )?;
    handler.configure(options);
    handler.info("Configured from JSON");

    handler.flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
