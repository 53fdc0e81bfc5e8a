//! The log stream: level filtering, dispatch and sink redirection
//!
//! A [`LogStream`] writes each accepted event straight to its sink until a
//! writer task is attached with [`LogStream::start_writer`]. From then on
//! events are pushed onto the stream's channel and written by the drain loop
//! (see `writer.rs`).

use super::{
    config::StreamConfig,
    level_filter::LevelFilter,
    log_event::LogEvent,
    log_level::LogLevel,
    metrics::StreamMetrics,
    signals::SignalRequests,
    writer::WriteQueue,
};
use crate::sinks::{self, RememberedTarget, ReopenTarget, Sink};
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

/// The current sink and the last target worth reapplying on the reopen signal.
/// Both change together under one lock.
pub(super) struct Output {
    pub(super) sink: Sink,
    pub(super) last_target: Option<RememberedTarget>,
}

pub struct LogStream {
    pub(super) filter: Mutex<LevelFilter>,
    pub(super) output: Mutex<Output>,
    pub(super) queue: Mutex<WriteQueue>,
    pub(super) signals: SignalRequests,
    pub(super) metrics: StreamMetrics,
    mirror_stderr: bool,
}

impl LogStream {
    /// Stream writing to stdout at `info`
    #[must_use]
    pub fn new() -> Arc<Self> {
        LogStreamBuilder::new().build()
    }

    /// Create a stream from configuration applied once at creation
    #[must_use]
    pub fn setup(config: StreamConfig) -> Arc<Self> {
        LogStreamBuilder::new().config(config).build()
    }

    #[must_use]
    pub fn builder() -> LogStreamBuilder {
        LogStreamBuilder::new()
    }

    fn with_options(level: LogLevel, mirror_stderr: bool) -> Self {
        Self {
            filter: Mutex::new(LevelFilter::new(level)),
            output: Mutex::new(Output {
                sink: Sink::default(),
                last_target: None,
            }),
            queue: Mutex::new(WriteQueue::new()),
            signals: SignalRequests::default(),
            metrics: StreamMetrics::new(),
            mirror_stderr,
        }
    }

    pub fn level(&self) -> LogLevel {
        self.filter.lock().level()
    }

    pub fn set_level(&self, level: LogLevel) {
        self.filter.lock().set_level(level);
    }

    /// Level remembered by the last toggle into debug
    pub fn previous_level(&self) -> Option<LogLevel> {
        self.filter.lock().previous()
    }

    /// Switch to debug, or back to the remembered level. Returns the new level.
    pub fn toggle_debug(&self) -> LogLevel {
        self.filter.lock().toggle_debug()
    }

    pub fn is_filtered(&self, level: LogLevel) -> bool {
        !self.filter.lock().accepts(level)
    }

    pub fn metrics(&self) -> &StreamMetrics {
        &self.metrics
    }

    /// Emit an event without extra fields. Returns `false` if the level is filtered.
    pub fn log(&self, level: LogLevel, message: impl Into<String>) -> bool {
        self.log_with(level, message, ())
    }

    /// Emit an event, merging `data` into the record when it serializes to a
    /// JSON object. Returns `false` if the level is filtered.
    pub fn log_with<D: Serialize>(&self, level: LogLevel, message: impl Into<String>, data: D) -> bool {
        self.process_signals();

        if self.is_filtered(level) {
            self.metrics.record_filtered();
            return false;
        }

        let line = LogEvent::new(level, message).with_data(data).to_json_line();
        self.metrics.record_emitted();
        self.dispatch(line);
        true
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Debug, message)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Info, message)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Warn, message)
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Error, message)
    }

    #[inline]
    pub fn fatal(&self, message: impl Into<String>) -> bool {
        self.log(LogLevel::Fatal, message)
    }

    pub fn debug_with<D: Serialize>(&self, message: impl Into<String>, data: D) -> bool {
        self.log_with(LogLevel::Debug, message, data)
    }

    pub fn info_with<D: Serialize>(&self, message: impl Into<String>, data: D) -> bool {
        self.log_with(LogLevel::Info, message, data)
    }

    pub fn warn_with<D: Serialize>(&self, message: impl Into<String>, data: D) -> bool {
        self.log_with(LogLevel::Warn, message, data)
    }

    pub fn error_with<D: Serialize>(&self, message: impl Into<String>, data: D) -> bool {
        self.log_with(LogLevel::Error, message, data)
    }

    pub fn fatal_with<D: Serialize>(&self, message: impl Into<String>, data: D) -> bool {
        self.log_with(LogLevel::Fatal, message, data)
    }

    /// Write one line to the current sink. Storage exhaustion is swallowed.
    pub(super) fn safe_write(&self, line: &str) {
        let mut output = self.output.lock();
        match output.sink.write_line(line) {
            Ok(()) => {
                self.metrics.record_written();
            }
            Err(e) if e.kind() == io::ErrorKind::StorageFull => {
                self.metrics.record_discarded();
            }
            Err(e) => {
                self.metrics.record_write_failure();
                let _ = writeln!(
                    io::stderr(),
                    "[LOGGER ERROR] Sink '{}' write failed: {}",
                    output.sink.name(),
                    e
                );
            }
        }
    }

    /// Redirect output to `target`.
    ///
    /// Stdout and handles always succeed. A path is validated first; if it is
    /// not writable the current sink stays in place and an `error` event
    /// describing the failure is emitted through this stream instead.
    ///
    /// With stderr mirroring on, the process error stream follows stdout and
    /// file targets. Handle targets leave it where it was; use [`mirror`]
    /// for those.
    ///
    /// [`mirror`]: LogStream::mirror
    pub fn reopen(&self, target: impl Into<ReopenTarget>) {
        let target = target.into();
        let log_file = match &target {
            ReopenTarget::Path(path) => Some(path.display().to_string()),
            _ => None,
        };

        match sinks::open_target(target) {
            Ok((sink, remembered)) => {
                let mut output = self.output.lock();
                let _ = output.sink.flush();
                output.sink = sink;
                output.last_target = remembered;
                self.mirror_stderr_to(&output.sink);
            }
            Err(err) => {
                self.error_with(
                    "log file is not writable",
                    json!({
                        "log_file": log_file,
                        "error": err.to_string(),
                    }),
                );
            }
        }
    }

    /// Point the process error stream at `sink`, when mirroring is on
    fn mirror_stderr_to(&self, sink: &Sink) {
        if !self.mirror_stderr {
            return;
        }
        if let Err(e) = sink.mirror_stderr() {
            self.metrics.record_write_failure();
            let _ = writeln!(io::stderr(), "[LOGGER ERROR] Failed to mirror stderr: {}", e);
        }
    }

    /// Reapply the last stdout or path target, if any
    pub(super) fn reopen_last(&self) {
        let last = self.output.lock().last_target.clone();
        if let Some(target) = last {
            self.reopen(target);
        }
    }

    /// Path of the last successfully reopened file, if that is the current target
    pub fn log_file(&self) -> Option<PathBuf> {
        match &self.output.lock().last_target {
            Some(RememberedTarget::Path(path)) => Some(path.clone()),
            _ => None,
        }
    }

    /// Secondary output that always writes to the current sink, following
    /// every reopen.
    pub fn mirror(self: &Arc<Self>) -> MirrorWriter {
        MirrorWriter {
            stream: Arc::clone(self),
        }
    }
}

/// `io::Write` view of a stream's current sink
pub struct MirrorWriter {
    stream: Arc<LogStream>,
}

impl Write for MirrorWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.stream.output.lock().sink.write_raw(buf)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.stream.output.lock().sink.flush()
    }
}

/// Builder for constructing a LogStream
///
/// # Example
/// ```no_run
/// use rust_log_stream::prelude::*;
///
/// let stream = LogStream::builder()
///     .level(LogLevel::Warn)
///     .file("/var/log/app.log")
///     .build();
///
/// assert!(!stream.info("filtered"));
/// assert!(stream.warn("written"));
/// ```
pub struct LogStreamBuilder {
    level: LogLevel,
    file: Option<PathBuf>,
    output: Option<ReopenTarget>,
    mirror_stderr: bool,
}

impl LogStreamBuilder {
    pub fn new() -> Self {
        Self {
            level: LogLevel::Info,
            file: None,
            output: None,
            mirror_stderr: true,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: LogLevel) -> Self {
        self.level = level;
        self
    }

    /// Reopen to this file once the stream is built
    #[must_use = "builder methods return a new value"]
    pub fn file(mut self, path: impl Into<PathBuf>) -> Self {
        self.file = Some(path.into());
        self
    }

    /// Start on this target instead of stdout. A configured file takes precedence.
    #[must_use = "builder methods return a new value"]
    pub fn output(mut self, target: impl Into<ReopenTarget>) -> Self {
        self.output = Some(target.into());
        self
    }

    /// Point the process error stream at the sink on every stdout or file
    /// reopen (on by default, unix only)
    #[must_use = "builder methods return a new value"]
    pub fn mirror_stderr(mut self, enabled: bool) -> Self {
        self.mirror_stderr = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: StreamConfig) -> Self {
        if let Some(level) = config.level {
            self.level = level;
        }
        if let Some(file) = config.file {
            self.file = Some(file);
        }
        if let Some(enabled) = config.mirror_stderr {
            self.mirror_stderr = enabled;
        }
        self
    }

    pub fn build(self) -> Arc<LogStream> {
        let stream = Arc::new(LogStream::with_options(self.level, self.mirror_stderr));
        match self.output {
            Some(target) => stream.reopen(target),
            None => stream.mirror_stderr_to(&stream.output.lock().sink),
        }
        if let Some(file) = self.file {
            stream.reopen(file);
        }
        stream
    }
}

impl Default for LogStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}
