//! Error types for the log stream

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Reopen target failed validation
    #[error("Log file '{path}' is not writable: {message}")]
    UnwritableTarget { path: String, message: String },

    /// A drain task is already attached to this stream
    #[error("Log stream writer already running")]
    WriterAlreadyRunning,

    /// `start_writer` was called outside of a tokio runtime
    #[error("No async runtime available to drive the log stream writer")]
    NoRuntime,

    /// Drain task panicked or was cancelled
    #[error("Log stream writer task failed: {0}")]
    WriterTask(String),

    /// Signal handler registration failed
    #[error("Failed to register handler for signal {signal}: {message}")]
    SignalRegistration { signal: i32, message: String },

    /// Level name could not be parsed
    #[error("Invalid log level: '{0}'")]
    InvalidLevel(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an unwritable reopen target error
    pub fn unwritable(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::UnwritableTarget {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a signal registration error
    pub fn signal_registration(signal: i32, message: impl Into<String>) -> Self {
        LoggerError::SignalRegistration {
            signal,
            message: message.into(),
        }
    }

    /// Create a writer task error
    pub fn writer_task<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterTask(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}
