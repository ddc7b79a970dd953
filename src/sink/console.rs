//! Console writer. Colors are applied per line from the record's level, so
//! formatters never need to know where their output ends up.

use super::RecordWriter;
use crate::fmt::color::{RESET, level_color};
use crate::level::Level;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// In-memory stream, for embedding applications that capture their own output.
#[derive(Debug, Clone, Default)]
pub struct MemoryBuffer(Arc<Mutex<Vec<u8>>>);

impl MemoryBuffer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    #[must_use]
    pub fn contents(&self) -> String {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn append(&self, bytes: &[u8]) {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
    }
}

/// Where console lines go.
#[derive(Debug, Clone, Default)]
pub enum Stream {
    #[default]
    Stdout,
    Stderr,
    Memory(MemoryBuffer),
}

/// All console rendering state in one struct.
#[derive(Debug, Clone)]
pub struct ConsoleWriter {
    stream: Stream,
    /// Piped output and CI environments can't render ANSI escape codes.
    colors: bool,
    /// Interactive use wants every line visible immediately.
    flush_each: bool,
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleWriter {
    /// Stdout, colors on, flush after every line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            stream: Stream::Stdout,
            colors: true,
            flush_each: true,
        }
    }

    #[must_use]
    pub fn stream(mut self, stream: Stream) -> Self {
        self.stream = stream;
        self
    }

    #[must_use]
    pub const fn colors(mut self, enabled: bool) -> Self {
        self.colors = enabled;
        self
    }

    /// Off lets the async sink batch flushes when its queue runs dry.
    #[must_use]
    pub const fn flush_each(mut self, enabled: bool) -> Self {
        self.flush_each = enabled;
        self
    }

    fn render(&self, level: Level, line: &str) -> String {
        if self.colors {
            format!("{}{line}{RESET}\n", level_color(level))
        } else {
            format!("{line}\n")
        }
    }
}

impl RecordWriter for ConsoleWriter {
    fn write_line(&mut self, level: Level, line: &str) -> Result<(), crate::Error> {
        let rendered = self.render(level, line);
        match &self.stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(rendered.as_bytes())?;
                if self.flush_each {
                    out.flush()?;
                }
            }
            Stream::Stderr => {
                let mut err = io::stderr().lock();
                err.write_all(rendered.as_bytes())?;
                if self.flush_each {
                    err.flush()?;
                }
            }
            Stream::Memory(buf) => buf.append(rendered.as_bytes()),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<(), crate::Error> {
        match &self.stream {
            Stream::Stdout => io::stdout().flush()?,
            Stream::Stderr => io::stderr().flush()?,
            Stream::Memory(_) => {}
        }
        Ok(())
    }
}
