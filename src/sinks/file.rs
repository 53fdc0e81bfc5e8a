//! Append-mode file sink and path validation

use crate::core::{LoggerError, Result};
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[cfg(unix)]
use std::os::unix::io::{AsRawFd, RawFd};

pub struct FileSink {
    path: PathBuf,
    file: File,
}

impl FileSink {
    /// Validate `path` and open it for appending.
    ///
    /// The path must either be writable already, or not exist yet with a
    /// writable parent directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_writable(&path)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::unwritable(path.display().to_string(), e.to_string()))?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let mut buf = Vec::with_capacity(line.len() + 1);
        buf.extend_from_slice(line.as_bytes());
        buf.push(b'\n');
        self.file.write_all(&buf)
    }

    pub fn write_raw(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[cfg(unix)]
impl AsRawFd for FileSink {
    fn as_raw_fd(&self) -> RawFd {
        self.file.as_raw_fd()
    }
}

/// Whether the current process may write to `path`, as `access(2)` with
/// `W_OK` decides it
#[cfg(unix)]
fn is_writable(path: &Path, _metadata: &fs::Metadata) -> bool {
    use std::ffi::CString;
    use std::os::unix::ffi::OsStrExt;

    let Ok(c_path) = CString::new(path.as_os_str().as_bytes()) else {
        return false;
    };
    // SAFETY: `c_path` is a valid NUL-terminated string for the whole call.
    unsafe { libc::access(c_path.as_ptr(), libc::W_OK) == 0 }
}

#[cfg(not(unix))]
fn is_writable(_path: &Path, metadata: &fs::Metadata) -> bool {
    !metadata.permissions().readonly()
}

fn ensure_writable(path: &Path) -> Result<()> {
    let unwritable = |message: &str| LoggerError::unwritable(path.display().to_string(), message);

    match fs::metadata(path) {
        Ok(metadata) if metadata.is_dir() => Err(unwritable("path is a directory")),
        Ok(metadata) if !is_writable(path, &metadata) => Err(unwritable("file is not writable")),
        Ok(_) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            let parent = match path.parent() {
                Some(parent) if !parent.as_os_str().is_empty() => parent,
                _ => Path::new("."),
            };
            match fs::metadata(parent) {
                Ok(metadata) if !metadata.is_dir() => {
                    Err(unwritable("parent is not a directory"))
                }
                Ok(metadata) if !is_writable(parent, &metadata) => {
                    Err(unwritable("parent directory is not writable"))
                }
                Ok(_) => Ok(()),
                Err(_) => Err(unwritable("parent directory does not exist")),
            }
        }
        Err(e) => Err(unwritable(&e.to_string())),
    }
}
