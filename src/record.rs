//! The value every sink consumes: one log event, rendered text plus metadata.

use crate::level::Level;
use chrono::{DateTime, Local};
use std::panic::Location as CallerLocation;
use std::thread;

/// Source position of the log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub file: &'static str,
    pub line: u32,
}

impl Location {
    /// Captures the position of the nearest caller not marked `#[track_caller]`.
    #[must_use]
    #[track_caller]
    pub fn caller() -> Self {
        let loc = CallerLocation::caller();
        Self {
            file: loc.file(),
            line: loc.line(),
        }
    }

    /// Just the file name, without directories, as the default formatter prints it.
    #[must_use]
    pub fn file_name(&self) -> &'static str {
        self.file
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(self.file)
    }
}

/// Immutable once built; moved into a sink's queue on submission.
#[derive(Debug, Clone)]
pub struct Record {
    pub level: Level,
    pub timestamp: DateTime<Local>,
    pub text: String,
    pub location: Option<Location>,
    /// Thread name when the producer thread has one, otherwise its id.
    pub thread: String,
}

impl Record {
    /// Stamps the record with the current time, calling thread, and call site.
    #[must_use]
    #[track_caller]
    pub fn new(level: Level, text: impl Into<String>) -> Self {
        Self {
            level,
            timestamp: Local::now(),
            text: text.into(),
            location: Some(Location::caller()),
            thread: current_thread_tag(),
        }
    }

    /// Replays and tests need records with a fixed timestamp.
    #[must_use]
    pub const fn at(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Records forwarded from elsewhere have no meaningful call site.
    #[must_use]
    pub const fn without_location(mut self) -> Self {
        self.location = None;
        self
    }
}

fn current_thread_tag() -> String {
    let current = thread::current();
    current.name().map_or_else(
        || format!("{:?}", current.id()),
        ToString::to_string,
    )
}
