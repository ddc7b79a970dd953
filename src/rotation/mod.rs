//! Rotation policy engine: decides when the active file rolls over, what the
//! archive is called, and which old archives survive.
//!
//! Everything here is free of file handles so the decisions can be tested
//! without I/O; the rotating sink writer drives it.

pub mod naming;
pub mod retention;
mod schedule;
mod size;

pub use naming::{TIMESTAMP_SUFFIX, archive_path, highest_generation};
pub use retention::{ArchivedFile, PruneResult, list_archives, prune};
pub use schedule::{is_due, next_rotation_time};
pub use size::{format_size, parse_size};

use chrono::{DateTime, Local};
use std::fmt;
use std::str::FromStr;

/// Default size threshold: 10 MiB.
pub const DEFAULT_MAX_BYTES: u64 = 10 * 1024 * 1024;
/// Default retention count.
pub const DEFAULT_MAX_FILES: usize = 5;

/// What triggers a rollover.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotationStrategy {
    /// Roll over before a write would push the file past `max_bytes`.
    BySize { max_bytes: u64 },
    /// Roll over at the first write on or after each full hour.
    Hourly,
    /// Roll over at the first write on or after each local midnight.
    Daily,
}

impl RotationStrategy {
    #[must_use]
    pub const fn is_time_based(self) -> bool {
        matches!(self, Self::Hourly | Self::Daily)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BySize { .. } => "size",
            Self::Hourly => "hourly",
            Self::Daily => "daily",
        }
    }
}

impl fmt::Display for RotationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BySize { max_bytes } => write!(f, "size({})", format_size(*max_bytes)),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Parses the config spelling; `"size"` takes the default threshold.
impl FromStr for RotationStrategy {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "size" | "bysize" | "by_size" => Ok(Self::BySize {
                max_bytes: DEFAULT_MAX_BYTES,
            }),
            "hourly" | "hour" => Ok(Self::Hourly),
            "daily" | "day" => Ok(Self::Daily),
            other => Err(crate::Error::InvalidConfig(format!(
                "unknown rotation strategy: '{other}'"
            ))),
        }
    }
}

/// Strategy plus retention; validated before any file is opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationPolicy {
    pub strategy: RotationStrategy,
    /// Archives kept after each rotation; 0 deletes them all.
    pub max_files: usize,
}

impl RotationPolicy {
    #[must_use]
    pub const fn by_size(max_bytes: u64, max_files: usize) -> Self {
        Self {
            strategy: RotationStrategy::BySize { max_bytes },
            max_files,
        }
    }

    #[must_use]
    pub const fn hourly(max_files: usize) -> Self {
        Self {
            strategy: RotationStrategy::Hourly,
            max_files,
        }
    }

    #[must_use]
    pub const fn daily(max_files: usize) -> Self {
        Self {
            strategy: RotationStrategy::Daily,
            max_files,
        }
    }

    /// Rejects parameters that would make every write rotate.
    ///
    /// # Errors
    /// `InvalidConfig` for a zero size threshold.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let RotationStrategy::BySize { max_bytes: 0 } = self.strategy {
            return Err(crate::Error::InvalidConfig(
                "size threshold must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for RotationPolicy {
    fn default() -> Self {
        Self::by_size(DEFAULT_MAX_BYTES, DEFAULT_MAX_FILES)
    }
}

/// Byte tally and deadline of the active file.
#[derive(Debug, Clone)]
pub struct RotationState {
    strategy: RotationStrategy,
    current_size: u64,
    next_deadline: Option<DateTime<Local>>,
}

impl RotationState {
    /// `existing_size` is the active file's length on disk when it was opened.
    #[must_use]
    pub fn new(strategy: RotationStrategy, existing_size: u64, now: DateTime<Local>) -> Self {
        Self {
            strategy,
            current_size: existing_size,
            next_deadline: next_rotation_time(strategy, now),
        }
    }

    /// Evaluated before a write of `incoming` bytes at `now`.
    ///
    /// A record larger than the whole threshold is written to an empty file
    /// as-is; rotating an empty file would gain nothing.
    #[must_use]
    pub fn should_rotate(&self, incoming: u64, now: DateTime<Local>) -> bool {
        match self.strategy {
            RotationStrategy::BySize { max_bytes } => {
                self.current_size > 0 && self.current_size.saturating_add(incoming) > max_bytes
            }
            RotationStrategy::Hourly | RotationStrategy::Daily => is_due(self.next_deadline, now),
        }
    }

    pub const fn record_write(&mut self, bytes: u64) {
        self.current_size = self.current_size.saturating_add(bytes);
    }

    /// Fresh file: zero bytes, deadline recomputed from `now`.
    pub fn reset(&mut self, now: DateTime<Local>) {
        self.current_size = 0;
        self.next_deadline = next_rotation_time(self.strategy, now);
    }

    #[must_use]
    pub const fn current_size(&self) -> u64 {
        self.current_size
    }

    #[must_use]
    pub const fn next_deadline(&self) -> Option<DateTime<Local>> {
        self.next_deadline
    }

    #[must_use]
    pub const fn strategy(&self) -> RotationStrategy {
        self.strategy
    }
}
