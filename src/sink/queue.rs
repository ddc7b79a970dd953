//! Queue settings and counters for the asynchronous sink.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

/// Default queue bound, in records.
pub const DEFAULT_CAPACITY: usize = 8192;

/// What `submit` does when the queue is full.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Wait for the worker to make room. Nothing is lost.
    #[default]
    Block,
    /// Evict the oldest queued record to make room for the new one.
    DropOldest,
    /// Refuse the new record with `QueueFull`.
    Reject,
}

impl OverflowPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Block => "block",
            Self::DropOldest => "drop_oldest",
            Self::Reject => "reject",
        }
    }
}

impl fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OverflowPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "block" => Ok(Self::Block),
            "drop_oldest" | "drop" => Ok(Self::DropOldest),
            "reject" => Ok(Self::Reject),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown overflow policy: '{other}'"
            ))),
        }
    }
}

/// What `close` does with records still queued.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ShutdownPolicy {
    /// Write everything accepted before the close.
    #[default]
    Drain,
    /// Drop what is still queued; it is counted as discarded.
    Discard,
}

impl ShutdownPolicy {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Drain => "drain",
            Self::Discard => "discard",
        }
    }
}

impl fmt::Display for ShutdownPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ShutdownPolicy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "drain" => Ok(Self::Drain),
            "discard" => Ok(Self::Discard),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown shutdown policy: '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueConfig {
    /// Maximum queued records; 0 means unbounded.
    pub capacity: usize,
    pub overflow: OverflowPolicy,
    pub on_close: ShutdownPolicy,
    /// Flush the writer after every record. Otherwise the worker flushes
    /// whenever the queue runs dry.
    pub flush_each: bool,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            overflow: OverflowPolicy::Block,
            on_close: ShutdownPolicy::Drain,
            flush_each: false,
        }
    }
}

impl QueueConfig {
    /// No bound, so `submit` never blocks or drops.
    #[must_use]
    pub fn unbounded() -> Self {
        Self {
            capacity: 0,
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    #[must_use]
    pub const fn overflow(mut self, policy: OverflowPolicy) -> Self {
        self.overflow = policy;
        self
    }

    #[must_use]
    pub const fn on_close(mut self, policy: ShutdownPolicy) -> Self {
        self.on_close = policy;
        self
    }

    #[must_use]
    pub const fn flush_each(mut self, enabled: bool) -> Self {
        self.flush_each = enabled;
        self
    }

    #[must_use]
    pub const fn is_bounded(&self) -> bool {
        self.capacity > 0
    }
}

/// Point-in-time copy of a sink's counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Records that passed the level filter and were offered to the queue.
    pub submitted: u64,
    pub written: u64,
    /// Below the sink's level.
    pub filtered: u64,
    /// Refused or evicted because the queue was full.
    pub dropped_overflow: u64,
    /// Submitted after close.
    pub dropped_closed: u64,
    /// Still queued when a discarding close ran.
    pub discarded: u64,
    /// Refused or skipped because the writer had failed.
    pub failed: u64,
}

impl QueueStats {
    /// Every record that was accepted or offered but never written.
    #[must_use]
    pub const fn dropped(&self) -> u64 {
        self.dropped_overflow + self.dropped_closed + self.discarded + self.failed
    }
}

#[derive(Debug, Default)]
pub(crate) struct Counters {
    pub(crate) submitted: AtomicU64,
    pub(crate) written: AtomicU64,
    pub(crate) filtered: AtomicU64,
    pub(crate) dropped_overflow: AtomicU64,
    pub(crate) dropped_closed: AtomicU64,
    pub(crate) discarded: AtomicU64,
    pub(crate) failed: AtomicU64,
}

impl Counters {
    pub(crate) fn bump(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn snapshot(&self) -> QueueStats {
        QueueStats {
            submitted: self.submitted.load(Ordering::Relaxed),
            written: self.written.load(Ordering::Relaxed),
            filtered: self.filtered.load(Ordering::Relaxed),
            dropped_overflow: self.dropped_overflow.load(Ordering::Relaxed),
            dropped_closed: self.dropped_closed.load(Ordering::Relaxed),
            discarded: self.discarded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
        }
    }
}
