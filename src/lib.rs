//! # Rust Log Stream
//!
//! An embeddable structured-logging stream. Events are filtered by severity,
//! encoded as one JSON object per line and written to a single sink (stdout or
//! an append-mode file) without blocking the caller.
//!
//! ## Features
//!
//! - **Dual-mode dispatch**: direct writes, or a cooperative drain task on a
//!   tokio runtime once [`LogStream::start_writer`] is called
//! - **No lost events**: stopping the writer flushes everything still queued
//! - **Hot reopen**: redirect output to a new file or handle at runtime
//! - **Signal control**: toggle debug logging and reopen the log file from
//!   `SIGTRAP` / `SIGUSR2`
//!
//! ```no_run
//! use rust_log_stream::prelude::*;
//! use serde_json::json;
//!
//! let stream = LogStream::setup(StreamConfig::new().with_file("/var/log/app.log"));
//! stream.info_with("check executed", json!({"check": "disk", "status": 0}));
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        Fields, LevelFilter, LogEvent, LogLevel, LogStream, LogStreamBuilder, LoggerError,
        MirrorWriter, Result, StreamConfig, StreamMetrics, WriterHandle,
    };
    #[cfg(all(unix, feature = "signals"))]
    pub use crate::core::SignalTraps;
    pub use crate::sinks::{ReopenTarget, Sink};
}

pub use crate::core::{
    Fields, LevelFilter, LogEvent, LogLevel, LogStream, LogStreamBuilder, LoggerError,
    MirrorWriter, Result, StreamConfig, StreamMetrics, WriterHandle,
};
#[cfg(all(unix, feature = "signals"))]
pub use crate::core::SignalTraps;
pub use sinks::{ReopenTarget, Sink};
