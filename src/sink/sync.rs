//! Synchronous sink: the caller's thread does the I/O while holding the
//! writer's mutex. Simple and ordered, but a slow device stalls every producer.

use super::{LevelFilter, RecordWriter, Sink, SinkStatus, Target};
use crate::fmt::{DefaultFormatter, Formatter};
use crate::level::Level;
use crate::record::Record;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

pub struct SyncSink {
    filter: LevelFilter,
    formatter: RwLock<Arc<dyn Formatter>>,
    /// `None` once closed.
    target: Mutex<Option<Target>>,
    flush_each: bool,
}

impl SyncSink {
    /// Accepts every level and renders with the uncolored default formatter.
    #[must_use]
    pub fn new(target: impl Into<Target>) -> Self {
        Self {
            filter: LevelFilter::default(),
            formatter: RwLock::new(Arc::new(DefaultFormatter::new())),
            target: Mutex::new(Some(target.into())),
            flush_each: false,
        }
    }

    #[must_use]
    pub fn with_level(self, level: Level) -> Self {
        self.filter.set(level);
        self
    }

    #[must_use]
    pub fn with_formatter(self, formatter: impl Formatter + 'static) -> Self {
        self.set_formatter(Arc::new(formatter));
        self
    }

    /// Flush the writer after every record instead of leaving it to `flush()`.
    #[must_use]
    pub const fn flush_each(mut self, enabled: bool) -> Self {
        self.flush_each = enabled;
        self
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.formatter.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Sink for SyncSink {
    fn submit(&self, record: Record) -> Result<(), crate::Error> {
        if !self.should_log(record.level) {
            return Ok(());
        }
        let line = self.formatter().format(&record);

        let mut guard = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        let Some(target) = guard.as_mut() else {
            return Err(crate::Error::Closed);
        };
        if let Some(reason) = target.failure() {
            return Err(crate::Error::SinkFailed(reason.to_string()));
        }
        target.write_line(record.level, &line)?;
        if self.flush_each {
            target.flush()?;
        }
        Ok(())
    }

    fn flush(&self) -> Result<(), crate::Error> {
        let mut guard = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_mut() {
            Some(target) => target.flush(),
            None => Ok(()),
        }
    }

    fn close(&self) -> Result<(), crate::Error> {
        let taken = self
            .target
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        // Dropping the target here releases the handle exactly once
        match taken {
            Some(mut target) => {
                let flushed = target.flush();
                match target.failure() {
                    Some(reason) => Err(crate::Error::SinkFailed(reason.to_string())),
                    None => flushed,
                }
            }
            None => Ok(()),
        }
    }

    fn level(&self) -> Level {
        self.filter.get()
    }

    fn set_level(&self, level: Level) {
        self.filter.set(level);
    }

    fn set_formatter(&self, formatter: Arc<dyn Formatter>) {
        *self.formatter.write().unwrap_or_else(PoisonError::into_inner) = formatter;
    }

    fn status(&self) -> SinkStatus {
        let guard = self.target.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            None => SinkStatus::Closed,
            Some(target) => target
                .failure()
                .map_or(SinkStatus::Open, |r| SinkStatus::Failed(r.to_string())),
        }
    }
}

impl Drop for SyncSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
