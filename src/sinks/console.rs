//! Console sink writing to the process standard output

use std::io::{self, Write};

/// Line-synchronous stdout sink; every write is flushed immediately.
#[derive(Debug, Default)]
pub struct ConsoleSink;

impl ConsoleSink {
    pub fn new() -> Self {
        Self
    }

    pub fn write_line(&mut self, line: &str) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(line.as_bytes())?;
        handle.write_all(b"\n")?;
        handle.flush()
    }

    pub fn write_raw(&mut self, buf: &[u8]) -> io::Result<()> {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle.write_all(buf)?;
        handle.flush()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        io::stdout().flush()
    }
}
