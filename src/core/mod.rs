//! Core log stream types

pub mod channel;
pub mod config;
pub mod error;
pub mod level_filter;
pub mod log_event;
pub mod log_level;
pub mod metrics;
pub mod signals;
pub mod stream;
pub mod timestamp;
pub mod writer;

pub use channel::{Callback, Channel};
pub use config::StreamConfig;
pub use error::{LoggerError, Result};
pub use level_filter::LevelFilter;
pub use log_event::{Fields, LogEvent};
pub use log_level::LogLevel;
pub use metrics::StreamMetrics;
#[cfg(all(unix, feature = "signals"))]
pub use signals::{SignalTraps, REOPEN_SIGNAL, TOGGLE_DEBUG_SIGNAL};
pub use stream::{LogStream, LogStreamBuilder, MirrorWriter};
pub use writer::WriterHandle;
