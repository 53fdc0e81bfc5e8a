//! Async logging example
//!
//! Demonstrates the cooperative drain loop on a tokio runtime, signal traps
//! and the lossless shutdown flush.
//!
//! Run with: cargo run --example async_logging

use rust_log_stream::prelude::*;
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    println!("=== Rust Log Stream - Async Logging Example ===\n");

    let stream = LogStream::builder().file("async_test.log").build();
    #[cfg(all(unix, feature = "signals"))]
    let _traps = stream.setup_signal_traps()?;

    let writer = stream.start_writer()?;

    println!("1. Emitting without blocking on the sink:");
    for i in 0..100 {
        stream.info(format!("Message #{}", i));
    }
    println!("   {} events waiting for the drain loop", stream.pending_events());

    println!("\n2. Concurrent tasks:");
    let mut tasks = Vec::new();
    for task_id in 0..4 {
        let stream = Arc::clone(&stream);
        tasks.push(tokio::spawn(async move {
            for i in 0..25 {
                stream.warn(format!("Task {} - Message {}", task_id, i));
            }
        }));
    }
    for task in tasks {
        task.await.map_err(|e| LoggerError::other(e.to_string()))?;
    }

    #[cfg(unix)]
    println!("   (send SIGTRAP to toggle debug, SIGUSR2 to reopen async_test.log)");
    tokio::time::sleep(Duration::from_millis(100)).await;

    println!("\n3. Shutting down the writer:");
    writer.shutdown().await?;
    let metrics = stream.metrics();
    println!(
        "   emitted {}, written {}, flushed on shutdown {}",
        metrics.emitted(),
        metrics.written(),
        metrics.flushed_on_shutdown()
    );

    println!("\n=== Example completed successfully! ===");

    Ok(())
}
