//! The facade callers log through: a level gate in front of a list of sinks.
//!
//! Records are built here, once, then cloned into each sink that wants them.
//! The sink list sits behind an `RwLock` so logging (read) never contends with
//! other loggers and only reconfiguration (write) takes exclusive access.

mod builder;
mod from_config;

pub use builder::{ConsoleBuilder, FileBuilder, LoggerBuilder, RotatingBuilder};

use crate::internal;
use crate::level::Level;
use crate::record::Record;
use crate::sink::{LevelFilter, Sink};
use std::sync::{Arc, PoisonError, RwLock};

pub struct Logger {
    level: LevelFilter,
    sinks: RwLock<Vec<Arc<dyn Sink>>>,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new(Level::Info)
    }
}

impl Logger {
    /// A logger with no sinks; records go nowhere until one is added.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self {
            level: LevelFilter::new(level),
            sinks: RwLock::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Appends a sink and returns its index.
    pub fn add_sink(&self, sink: impl Sink + 'static) -> usize {
        self.add_shared(Arc::new(sink))
    }

    /// Same as `add_sink`, for a sink the caller also keeps a handle to.
    pub fn add_shared(&self, sink: Arc<dyn Sink>) -> usize {
        let mut sinks = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        sinks.push(sink);
        sinks.len() - 1
    }

    #[must_use]
    pub fn sink(&self, index: usize) -> Option<Arc<dyn Sink>> {
        self.sinks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(index)
            .cloned()
    }

    /// Detaches the sink at `index`; later sinks shift down by one. The sink
    /// closes when its last handle is dropped.
    pub fn remove_sink(&self, index: usize) -> Option<Arc<dyn Sink>> {
        let mut sinks = self.sinks.write().unwrap_or_else(PoisonError::into_inner);
        (index < sinks.len()).then(|| sinks.remove(index))
    }

    pub fn clear_sinks(&self) {
        let removed = std::mem::take(&mut *self.sinks.write().unwrap_or_else(PoisonError::into_inner));
        drop(removed);
    }

    #[must_use]
    pub fn sink_count(&self) -> usize {
        self.sinks.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.level.get()
    }

    pub fn set_level(&self, level: Level) {
        self.level.set(level);
    }

    #[must_use]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level.get()
    }

    /// Logs `text` at `level`, tagged with the caller's location.
    #[track_caller]
    pub fn log(&self, level: Level, text: &str) {
        if !self.enabled(level) {
            return;
        }
        self.dispatch(Record::new(level, text));
    }

    /// Passes a prepared record through the level gate to every sink.
    ///
    /// Refusals (overflow, closed, failed) are counted and reported by the
    /// sink itself; one refusing sink never keeps the others from the record.
    pub fn dispatch(&self, record: Record) {
        if !self.enabled(record.level) {
            return;
        }
        let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
        if let Some((last, rest)) = sinks.split_last() {
            for sink in rest {
                let _ = sink.submit(record.clone());
            }
            let _ = last.submit(record);
        }
    }

    #[track_caller]
    pub fn debug(&self, text: &str) {
        self.log(Level::Debug, text);
    }

    #[track_caller]
    pub fn info(&self, text: &str) {
        self.log(Level::Info, text);
    }

    #[track_caller]
    pub fn warn(&self, text: &str) {
        self.log(Level::Warning, text);
    }

    #[track_caller]
    pub fn error(&self, text: &str) {
        self.log(Level::Error, text);
    }

    #[track_caller]
    pub fn fatal(&self, text: &str) {
        self.log(Level::Fatal, text);
    }

    /// Flushes every sink, even after one fails.
    ///
    /// # Errors
    /// The first error any sink returned.
    pub fn flush(&self) -> Result<(), crate::Error> {
        let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
        first_error(sinks.iter().map(|s| s.flush()))
    }

    /// Closes every sink. The sinks stay attached and report `Closed`.
    ///
    /// # Errors
    /// The first error any sink returned.
    pub fn close(&self) -> Result<(), crate::Error> {
        internal::debug("LOGGER", &format!("Closing {} sink(s)", self.sink_count()));
        let sinks = self.sinks.read().unwrap_or_else(PoisonError::into_inner);
        first_error(sinks.iter().map(|s| s.close()))
    }
}

fn first_error(results: impl Iterator<Item = Result<(), crate::Error>>) -> Result<(), crate::Error> {
    let mut first = Ok(());
    for result in results {
        if first.is_ok() {
            first = result;
        }
    }
    first
}
