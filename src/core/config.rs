//! Creation-time stream configuration

use super::log_level::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Options applied once when a stream is created
///
/// # Example
///
/// ```
/// use rust_log_stream::{LogLevel, StreamConfig};
///
/// let config: StreamConfig = serde_json::from_str(r#"{"level": "warn"}"#).unwrap();
/// assert_eq!(config.level, Some(LogLevel::Warn));
/// assert!(config.file.is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// Initial level; `info` when absent
    pub level: Option<LogLevel>,
    /// File to reopen the stream to; stdout when absent
    pub file: Option<PathBuf>,
    /// Point the process error stream at the sink; on when absent
    pub mirror_stderr: Option<bool>,
}

impl StreamConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_level(mut self, level: LogLevel) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    #[must_use]
    pub fn with_mirror_stderr(mut self, enabled: bool) -> Self {
        self.mirror_stderr = Some(enabled);
        self
    }
}
