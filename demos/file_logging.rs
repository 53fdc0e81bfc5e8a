//! File logging example
//!
//! Demonstrates logging to a file, reopening after rotation and the
//! self-reported failure for an unwritable path.
//!
//! Run with: cargo run --example file_logging

use rust_log_stream::prelude::*;
use serde_json::json;

fn main() -> Result<()> {
    println!("=== Rust Log Stream - File Logging Example ===\n");

    let stream = LogStream::setup(
        StreamConfig::new()
            .with_level(LogLevel::Debug)
            .with_file("application.log"),
    );

    println!("1. Logging to application.log:");
    stream.info("Application started");
    stream.debug("Loading configuration...");
    stream.info_with("Configuration loaded", json!({"entries": 12}));
    stream.warn("Using default settings for some options");

    println!("2. Rotating the file and reopening:");
    std::fs::rename("application.log", "application.log.1")?;
    stream.request_reopen();
    stream.info("Written to a fresh application.log");

    println!("3. Reopening to an unwritable path (reported on the current sink):");
    stream.reopen("/nonexistent-log-dir/application.log");
    println!("   current file: {:?}", stream.log_file());

    println!("4. Back to stdout:");
    stream.reopen(ReopenTarget::Stdout);
    stream.info("Application initialization complete");

    println!("\nFile logging complete! Check application.log and application.log.1");
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
