//! Basic stream usage example
//!
//! Demonstrates direct logging to stdout, level filtering and structured fields.
//!
//! Run with: cargo run --example basic_usage

use rust_log_stream::prelude::*;
use rust_log_stream::info;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Rust Log Stream - Basic Usage Example ===\n");

    // Create a stream writing to stdout at the default level (info)
    let stream = LogStream::new();

    println!("1. Logging at different levels:");
    stream.debug("This is a debug message (hidden)");
    stream.info("This is an info message");
    stream.warn("This is a warning message");
    stream.error("This is an error message");
    stream.fatal("This is a fatal message");

    println!("\n2. Structured fields:");
    stream.info_with(
        "check executed",
        json!({"check": "disk_usage", "status": 0, "output": "OK"}),
    );

    println!("\n3. Changing the level:");
    stream.set_level(LogLevel::Debug);
    stream.debug("Debug message (visible)");
    stream.set_level(LogLevel::Warn);
    let emitted = stream.info("Info message (hidden)");
    println!("   info emitted at warn level: {}", emitted);

    println!("\n4. Toggling debug:");
    stream.toggle_debug();
    info!(stream, "Now at {} after toggle", stream.level());
    stream.toggle_debug();
    println!("   back to {}", stream.level());

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
