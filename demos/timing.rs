//! Operation timing example
//!
//! Demonstrates the scoped timer and the sync and async timing helpers.
//!
//! Run with: cargo run --example timing

use policy_engine_logger::prelude::*;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Policy Engine Logger - Timing Example ===\n");

    let handler = LogHandler::builder()
        .debug_mode(true)
        .appender(ConsoleAppender::new())
        .build();
    handler.set_screen("Dashboard");

    println!("1. Timing a closure:");
    let total: u64 = handler.time("sum_rules", || (1..=1_000).sum());
    println!("   total = {}", total);

    println!("\n2. Errors pass through after the timing entry:");
    let parsed: std::result::Result<u16, _> = handler.time("parse_port", || "eighty".parse::<u16>());
    println!("   parsed = {:?}", parsed);

    println!("\n3. Timing a future:");
    let fetched = handler
        .time_async("fetch_remote_policies", async {
            tokio::time::sleep(Duration::from_millis(25)).await;
            vec!["session.timeout", "password.min_length"]
        })
        .await;
    println!("   fetched {} policies", fetched.len());

    println!("\n4. Scoped timer:");
    {
        let timer = handler.start_timer("render_widgets");
        std::thread::sleep(Duration::from_millis(10));
        println!("   elapsed so far: {:?}", timer.elapsed());
    }

    handler.flush()?;
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
