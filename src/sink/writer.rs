//! The closed set of writers a sink can drive.

use super::{ConsoleWriter, FileWriter, RotatingFileWriter};
use crate::level::Level;
use std::fmt;

/// Exclusive-access writer: `&mut self` everywhere, because exactly one
/// thread (the sink's worker, or the holder of the sync sink's mutex) ever
/// touches it.
pub trait RecordWriter: Send + fmt::Debug {
    /// Writes one rendered line; the writer appends the newline.
    ///
    /// # Errors
    /// I/O failure, or the writer failed earlier and refuses further writes.
    fn write_line(&mut self, level: Level, line: &str) -> Result<(), crate::Error>;

    /// # Errors
    /// I/O failure while flushing buffered bytes.
    fn flush(&mut self) -> Result<(), crate::Error>;

    /// Reason the writer became permanently unusable, if it did.
    fn failure(&self) -> Option<&str> {
        None
    }
}

#[derive(Debug)]
pub enum Target {
    Console(ConsoleWriter),
    File(FileWriter),
    Rotating(RotatingFileWriter),
}

impl RecordWriter for Target {
    fn write_line(&mut self, level: Level, line: &str) -> Result<(), crate::Error> {
        match self {
            Self::Console(w) => w.write_line(level, line),
            Self::File(w) => w.write_line(level, line),
            Self::Rotating(w) => w.write_line(level, line),
        }
    }

    fn flush(&mut self) -> Result<(), crate::Error> {
        match self {
            Self::Console(w) => w.flush(),
            Self::File(w) => w.flush(),
            Self::Rotating(w) => w.flush(),
        }
    }

    fn failure(&self) -> Option<&str> {
        match self {
            Self::Console(w) => w.failure(),
            Self::File(w) => w.failure(),
            Self::Rotating(w) => w.failure(),
        }
    }
}

impl From<ConsoleWriter> for Target {
    fn from(w: ConsoleWriter) -> Self {
        Self::Console(w)
    }
}

impl From<FileWriter> for Target {
    fn from(w: FileWriter) -> Self {
        Self::File(w)
    }
}

impl From<RotatingFileWriter> for Target {
    fn from(w: RotatingFileWriter) -> Self {
        Self::Rotating(w)
    }
}
