//! Logging macros for ergonomic message formatting.
//!
//! Each macro formats its arguments like `format!` and returns the same `bool`
//! as the corresponding stream method.
//!
//! # Examples
//!
//! ```
//! use rust_log_stream::prelude::*;
//! use rust_log_stream::info;
//!
//! let stream = LogStream::builder()
//!     .output(ReopenTarget::handle(std::io::sink()))
//!     .build();
//!
//! let port = 8080;
//! assert!(info!(stream, "Server listening on port {}", port));
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_log_stream::prelude::*;
/// # let stream = LogStream::builder().output(ReopenTarget::handle(std::io::sink())).build();
/// use rust_log_stream::log;
/// assert!(log!(stream, LogLevel::Info, "Simple message"));
/// assert!(!log!(stream, LogLevel::Debug, "Filtered: {}", 1));
/// ```
#[macro_export]
macro_rules! log {
    ($stream:expr, $level:expr, $($arg:tt)+) => {
        $stream.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($stream:expr, $($arg:tt)+) => {
        $crate::log!($stream, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($stream:expr, $($arg:tt)+) => {
        $crate::log!($stream, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($stream:expr, $($arg:tt)+) => {
        $crate::log!($stream, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_log_stream::prelude::*;
/// # let stream = LogStream::builder().output(ReopenTarget::handle(std::io::sink())).build();
/// use rust_log_stream::error;
/// let code = 500;
/// assert!(error!(stream, "Request failed with status {}", code));
/// ```
#[macro_export]
macro_rules! error {
    ($stream:expr, $($arg:tt)+) => {
        $crate::log!($stream, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
#[macro_export]
macro_rules! fatal {
    ($stream:expr, $($arg:tt)+) => {
        $crate::log!($stream, $crate::LogLevel::Fatal, $($arg)+)
    };
}
