//! Output sinks and reopen targets
//!
//! A stream owns exactly one [`Sink`] at a time. [`ReopenTarget`] names what a
//! reopen should redirect it to.

pub mod console;
pub mod file;

pub use console::ConsoleSink;
pub use file::FileSink;

use crate::core::Result;
use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;

/// The current writable destination
pub enum Sink {
    Console(ConsoleSink),
    File(FileSink),
    Handle(Box<dyn Write + Send>),
}

impl Sink {
    /// Append one serialized event followed by a newline, then flush
    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self {
            Sink::Console(console) => console.write_line(line),
            Sink::File(file) => file.write_line(line),
            Sink::Handle(handle) => {
                handle.write_all(line.as_bytes())?;
                handle.write_all(b"\n")?;
                handle.flush()
            }
        }
    }

    /// Write bytes verbatim; used by the mirror stream
    pub fn write_raw(&mut self, buf: &[u8]) -> io::Result<()> {
        match self {
            Sink::Console(console) => console.write_raw(buf),
            Sink::File(file) => file.write_raw(buf),
            Sink::Handle(handle) => handle.write_all(buf),
        }
    }

    pub fn flush(&mut self) -> io::Result<()> {
        match self {
            Sink::Console(console) => console.flush(),
            Sink::File(file) => file.flush(),
            Sink::Handle(handle) => handle.flush(),
        }
    }

    /// Duplicate this sink's descriptor onto the process error stream.
    /// Handle sinks have no descriptor and leave stderr untouched.
    #[cfg(unix)]
    pub fn mirror_stderr(&self) -> io::Result<()> {
        use std::os::unix::io::AsRawFd;

        let fd = match self {
            Sink::Console(_) => io::stdout().as_raw_fd(),
            Sink::File(file) => file.as_raw_fd(),
            Sink::Handle(_) => return Ok(()),
        };
        // SAFETY: `fd` is open for the duration of the call and dup2 only
        // replaces descriptor 2.
        if unsafe { libc::dup2(fd, libc::STDERR_FILENO) } == -1 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn mirror_stderr(&self) -> io::Result<()> {
        Ok(())
    }

    pub fn name(&self) -> &str {
        match self {
            Sink::Console(_) => "console",
            Sink::File(_) => "file",
            Sink::Handle(_) => "handle",
        }
    }
}

impl Default for Sink {
    fn default() -> Self {
        Sink::Console(ConsoleSink::new())
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sink::Console(_) => f.write_str("Sink::Console"),
            Sink::File(file) => f.debug_tuple("Sink::File").field(&file.path()).finish(),
            Sink::Handle(_) => f.write_str("Sink::Handle"),
        }
    }
}

/// Where a reopen should send output
pub enum ReopenTarget {
    /// Process standard output
    Stdout,
    /// A file path, opened in append mode after validation
    Path(PathBuf),
    /// An already-open writer, used as-is
    Handle(Box<dyn Write + Send>),
}

impl ReopenTarget {
    pub fn handle<W: Write + Send + 'static>(writer: W) -> Self {
        ReopenTarget::Handle(Box::new(writer))
    }
}

impl fmt::Debug for ReopenTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReopenTarget::Stdout => f.write_str("Stdout"),
            ReopenTarget::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ReopenTarget::Handle(_) => f.write_str("Handle"),
        }
    }
}

impl From<PathBuf> for ReopenTarget {
    fn from(path: PathBuf) -> Self {
        ReopenTarget::Path(path)
    }
}

impl From<&std::path::Path> for ReopenTarget {
    fn from(path: &std::path::Path) -> Self {
        ReopenTarget::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for ReopenTarget {
    fn from(path: &PathBuf) -> Self {
        ReopenTarget::Path(path.clone())
    }
}

impl From<&str> for ReopenTarget {
    fn from(path: &str) -> Self {
        ReopenTarget::Path(PathBuf::from(path))
    }
}

impl From<String> for ReopenTarget {
    fn from(path: String) -> Self {
        ReopenTarget::Path(PathBuf::from(path))
    }
}

impl From<std::fs::File> for ReopenTarget {
    fn from(file: std::fs::File) -> Self {
        ReopenTarget::Handle(Box::new(file))
    }
}

impl From<io::Stdout> for ReopenTarget {
    fn from(_: io::Stdout) -> Self {
        ReopenTarget::Stdout
    }
}

/// Target kept for signal-triggered reopen. Handles are not kept: reapplying
/// an already-open handle changes nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RememberedTarget {
    Stdout,
    Path(PathBuf),
}

impl From<RememberedTarget> for ReopenTarget {
    fn from(target: RememberedTarget) -> Self {
        match target {
            RememberedTarget::Stdout => ReopenTarget::Stdout,
            RememberedTarget::Path(path) => ReopenTarget::Path(path),
        }
    }
}

/// Resolve a target into a sink plus what to remember for the reopen signal
pub(crate) fn open_target(target: ReopenTarget) -> Result<(Sink, Option<RememberedTarget>)> {
    match target {
        ReopenTarget::Stdout => Ok((Sink::Console(ConsoleSink::new()), Some(RememberedTarget::Stdout))),
        ReopenTarget::Path(path) => {
            let sink = FileSink::open(path.clone())?;
            Ok((Sink::File(sink), Some(RememberedTarget::Path(path))))
        }
        ReopenTarget::Handle(handle) => Ok((Sink::Handle(handle), None)),
    }
}
