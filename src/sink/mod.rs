//! Sinks: where records end up.
//!
//! A sink pairs a writer (console, plain file, rotating file) with a level
//! filter and a formatter. `SyncSink` writes on the caller's thread under a
//! mutex; `AsyncSink` hands records to a private worker thread that owns the
//! writer outright.

mod console;
mod dispatch;
mod file;
mod queue;
mod rotating;
mod sync;
mod writer;

pub use console::{ConsoleWriter, MemoryBuffer, Stream};
pub use dispatch::AsyncSink;
pub use file::FileWriter;
pub use queue::{DEFAULT_CAPACITY, OverflowPolicy, QueueConfig, QueueStats, ShutdownPolicy};
pub use rotating::RotatingFileWriter;
pub use sync::SyncSink;
pub use writer::{RecordWriter, Target};

use crate::fmt::Formatter;
use crate::level::Level;
use crate::record::Record;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

/// Lifecycle as seen from the facade.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkStatus {
    Open,
    /// An unrecoverable I/O failure; the sink accepts nothing further.
    Failed(String),
    Closed,
}

/// `Send + Sync` so one sink can be shared by every producer thread.
pub trait Sink: Send + Sync {
    /// Hands a record to the sink. Records below the sink's level are
    /// accepted and silently dropped.
    ///
    /// # Errors
    /// The record was refused: queue overflow, sink closed, or sink failed.
    fn submit(&self, record: Record) -> Result<(), crate::Error>;

    /// Returns once everything submitted before the call has reached the writer
    /// and the writer has been flushed.
    ///
    /// # Errors
    /// I/O errors from the underlying resource, or an earlier permanent failure.
    fn flush(&self) -> Result<(), crate::Error>;

    /// Stops accepting records, settles pending ones, and releases the
    /// resource. Idempotent.
    ///
    /// # Errors
    /// The final flush failed, or the sink had failed earlier.
    fn close(&self) -> Result<(), crate::Error>;

    fn level(&self) -> Level;

    fn set_level(&self, level: Level);

    /// Applies to records submitted after the call.
    fn set_formatter(&self, formatter: Arc<dyn Formatter>);

    fn status(&self) -> SinkStatus;

    fn should_log(&self, level: Level) -> bool {
        level >= self.level()
    }
}

/// Per-sink threshold, adjustable while producers are logging.
#[derive(Debug)]
pub(crate) struct LevelFilter(AtomicU8);

impl LevelFilter {
    pub(crate) const fn new(level: Level) -> Self {
        Self(AtomicU8::new(level as u8))
    }

    pub(crate) fn get(&self) -> Level {
        Level::from_u8(self.0.load(Ordering::Relaxed))
    }

    pub(crate) fn set(&self, level: Level) {
        self.0.store(level as u8, Ordering::Relaxed);
    }
}

impl Default for LevelFilter {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}
