//! Asynchronous sink: producers enqueue, one worker thread writes.
//!
//! The worker owns the writer outright, so file handles are never shared
//! between threads and records from one producer reach the file in the order
//! they were submitted. `closed` is a read/write gate: every enqueue happens
//! under the read side, and `close` flips the flag under the write side
//! before sending `Shutdown`, so nothing can land in the queue behind it.

use super::queue::Counters;
use super::{
    LevelFilter, OverflowPolicy, QueueConfig, QueueStats, RecordWriter, ShutdownPolicy, Sink,
    SinkStatus, Target,
};
use crate::fmt::{DefaultFormatter, Formatter};
use crate::internal;
use crate::level::Level;
use crate::record::Record;
use crossbeam_channel::{Receiver, Sender, TrySendError};
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

/// A record plus the formatter that was current when it was submitted.
struct Entry {
    record: Record,
    formatter: Arc<dyn Formatter>,
}

enum Command {
    Write(Entry),
    Flush(Sender<Result<(), crate::Error>>),
    Shutdown,
}

/// State shared between the handle and the worker.
#[derive(Debug, Default)]
struct Shared {
    counters: Counters,
    failed: AtomicBool,
    reason: Mutex<Option<String>>,
    discarding: AtomicBool,
}

impl Shared {
    fn fail(&self, reason: &str) {
        let mut slot = self.reason.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.is_none() {
            *slot = Some(reason.to_string());
        }
        self.failed.store(true, Ordering::Release);
    }

    fn failure(&self) -> Option<String> {
        if !self.failed.load(Ordering::Acquire) {
            return None;
        }
        self.reason
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub struct AsyncSink {
    name: String,
    filter: LevelFilter,
    formatter: RwLock<Arc<dyn Formatter>>,
    config: QueueConfig,
    tx: Sender<Command>,
    /// Producer-side receiver, used only to evict under `DropOldest`.
    evict: Receiver<Command>,
    closed: RwLock<bool>,
    shared: Arc<Shared>,
    worker: Mutex<Option<JoinHandle<()>>>,
}

impl AsyncSink {
    /// Starts the worker thread for `target`.
    ///
    /// # Errors
    /// The worker thread could not be spawned.
    pub fn new(
        name: impl Into<String>,
        target: impl Into<Target>,
        config: QueueConfig,
    ) -> Result<Self, crate::Error> {
        let name = name.into();
        let (tx, rx) = if config.is_bounded() {
            crossbeam_channel::bounded(config.capacity)
        } else {
            crossbeam_channel::unbounded()
        };
        let shared = Arc::new(Shared::default());

        let mut target = target.into();
        let worker_rx = rx.clone();
        let worker_shared = Arc::clone(&shared);
        let flush_each = config.flush_each;
        let handle = thread::Builder::new()
            .name(format!("strandlog-{name}"))
            .spawn(move || run_worker(&mut target, &worker_rx, &worker_shared, flush_each))
            .map_err(|e| {
                internal::error("DISPATCH", &format!("Failed to spawn worker for {name}: {e}"));
                crate::Error::Io(e)
            })?;

        internal::debug(
            "DISPATCH",
            &format!(
                "Started sink {name} (capacity {}, overflow {}, on close {})",
                config.capacity, config.overflow, config.on_close
            ),
        );

        Ok(Self {
            name,
            filter: LevelFilter::default(),
            formatter: RwLock::new(Arc::new(DefaultFormatter::new())),
            config,
            tx,
            evict: rx,
            closed: RwLock::new(false),
            shared,
            worker: Mutex::new(Some(handle)),
        })
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

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn config(&self) -> QueueConfig {
        self.config
    }

    #[must_use]
    pub fn stats(&self) -> QueueStats {
        self.shared.counters.snapshot()
    }

    /// Commands waiting for the worker.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.tx.len()
    }

    fn formatter(&self) -> Arc<dyn Formatter> {
        Arc::clone(&self.formatter.read().unwrap_or_else(PoisonError::into_inner))
    }

    fn enqueue(&self, command: Command) -> Result<(), crate::Error> {
        match self.config.overflow {
            OverflowPolicy::Block => self.tx.send(command).map_err(|_| crate::Error::Closed),
            OverflowPolicy::Reject => match self.tx.try_send(command) {
                Ok(()) => Ok(()),
                Err(TrySendError::Full(_)) => Err(crate::Error::QueueFull),
                Err(TrySendError::Disconnected(_)) => Err(crate::Error::Closed),
            },
            OverflowPolicy::DropOldest => self.enqueue_evicting(command),
        }
    }

    fn enqueue_evicting(&self, mut command: Command) -> Result<(), crate::Error> {
        loop {
            match self.tx.try_send(command) {
                Ok(()) => return Ok(()),
                Err(TrySendError::Disconnected(_)) => return Err(crate::Error::Closed),
                Err(TrySendError::Full(back)) => {
                    command = back;
                    // The worker may have emptied the slot first; just retry then
                    if let Ok(evicted) = self.evict.try_recv() {
                        self.evicted(evicted);
                    }
                }
            }
        }
    }

    fn evicted(&self, command: Command) {
        match command {
            Command::Write(_) => Counters::bump(&self.shared.counters.dropped_overflow),
            Command::Flush(ack) => {
                let _ = ack.send(Err(crate::Error::QueueFull));
            }
            // Only `close` sends this, after the gate is shut
            Command::Shutdown => {}
        }
    }
}

impl Sink for AsyncSink {
    fn submit(&self, record: Record) -> Result<(), crate::Error> {
        let counters = &self.shared.counters;
        if !self.should_log(record.level) {
            Counters::bump(&counters.filtered);
            return Ok(());
        }

        let closed = self.closed.read().unwrap_or_else(PoisonError::into_inner);
        if *closed {
            Counters::bump(&counters.dropped_closed);
            internal::warn("DISPATCH", &format!("Sink {} is closed, record dropped", self.name));
            return Err(crate::Error::Closed);
        }
        if let Some(reason) = self.shared.failure() {
            Counters::bump(&counters.failed);
            return Err(crate::Error::SinkFailed(reason));
        }

        Counters::bump(&counters.submitted);
        let entry = Entry {
            record,
            formatter: self.formatter(),
        };
        let result = self.enqueue(Command::Write(entry));
        if matches!(result, Err(crate::Error::QueueFull)) {
            Counters::bump(&counters.dropped_overflow);
            internal::warn("DISPATCH", &format!("Queue of sink {} full, record rejected", self.name));
        }
        result
    }

    fn flush(&self) -> Result<(), crate::Error> {
        let (ack_tx, ack_rx) = crossbeam_channel::bounded(1);
        {
            let closed = self.closed.read().unwrap_or_else(PoisonError::into_inner);
            if *closed {
                return self
                    .shared
                    .failure()
                    .map_or(Ok(()), |r| Err(crate::Error::SinkFailed(r)));
            }
            self.enqueue(Command::Flush(ack_tx))?;
        }
        ack_rx.recv().unwrap_or(Err(crate::Error::Closed))
    }

    fn close(&self) -> Result<(), crate::Error> {
        {
            let mut closed = self.closed.write().unwrap_or_else(PoisonError::into_inner);
            if *closed {
                return Ok(());
            }
            *closed = true;

            if self.config.on_close == ShutdownPolicy::Discard {
                self.shared.discarding.store(true, Ordering::Release);
            }
            // Blocking send even under other policies: Shutdown must never be lost
            let _ = self.tx.send(Command::Shutdown);
        }

        let handle = self
            .worker
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            if handle.join().is_err() {
                internal::error("DISPATCH", &format!("Worker of sink {} panicked", self.name));
            }
        }

        let stats = self.stats();
        internal::debug(
            "DISPATCH",
            &format!(
                "Closed sink {} ({} written, {} dropped)",
                self.name,
                stats.written,
                stats.dropped()
            ),
        );

        self.shared
            .failure()
            .map_or(Ok(()), |r| Err(crate::Error::SinkFailed(r)))
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
        if let Some(reason) = self.shared.failure() {
            return SinkStatus::Failed(reason);
        }
        if *self.closed.read().unwrap_or_else(PoisonError::into_inner) {
            SinkStatus::Closed
        } else {
            SinkStatus::Open
        }
    }
}

impl Drop for AsyncSink {
    fn drop(&mut self) {
        let _ = self.close();
    }
}

/// Worker loop: runs until `Shutdown`, then flushes and drops the writer.
fn run_worker(target: &mut Target, rx: &Receiver<Command>, shared: &Shared, flush_each: bool) {
    let counters = &shared.counters;

    while let Ok(command) = rx.recv() {
        match command {
            Command::Write(entry) => {
                if shared.discarding.load(Ordering::Acquire) {
                    Counters::bump(&counters.discarded);
                    continue;
                }
                if shared.failed.load(Ordering::Acquire) {
                    Counters::bump(&counters.failed);
                    continue;
                }

                // A panicking formatter or writer fails the sink; the loop keeps
                // draining so flush acks and blocked producers are released
                let written = panic::catch_unwind(AssertUnwindSafe(|| {
                    let line = entry.formatter.format(&entry.record);
                    target.write_line(entry.record.level, &line)
                }));
                match written {
                    Ok(Ok(())) => Counters::bump(&counters.written),
                    Ok(Err(e)) => {
                        Counters::bump(&counters.failed);
                        if let Some(reason) = target.failure() {
                            shared.fail(reason);
                        }
                        internal::error("DISPATCH", &format!("Write failed: {e}"));
                    }
                    Err(_) => {
                        Counters::bump(&counters.failed);
                        shared.fail("worker panicked while writing a record");
                        internal::error("DISPATCH", "Worker panicked, sink failed");
                        continue;
                    }
                }

                if flush_each || rx.is_empty() {
                    if let Err(e) = target.flush() {
                        internal::warn("DISPATCH", &format!("Flush failed: {e}"));
                    }
                }
            }
            Command::Flush(ack) => {
                let result = match shared.failure() {
                    Some(reason) => Err(crate::Error::SinkFailed(reason)),
                    None => target.flush(),
                };
                let _ = ack.send(result);
            }
            Command::Shutdown => break,
        }
    }

    if let Err(e) = target.flush() {
        internal::warn("DISPATCH", &format!("Final flush failed: {e}"));
    }
}
