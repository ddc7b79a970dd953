//! `strandlog` - Leveled logging with per-sink serial dispatch and rotating files.
//!
//! Records are built once by the [`Logger`] facade and fanned out to sinks.
//! Each [`AsyncSink`] owns its writer on a dedicated worker thread, so
//! producers only pay for an enqueue and every destination is touched by
//! exactly one writer. File-backed sinks can rotate by size, hourly, or daily,
//! and prune old archives down to a retention count.
//!
//! # Example
//!
//! ```no_run
//! use strandlog::{Level, Logger, RotationPolicy};
//!
//! let logger = Logger::builder()
//!     .level(Level::Debug)
//!     .console()
//!         .colors(true)
//!         .done()
//!     .rotating("logs/app.log", RotationPolicy::by_size(10 * 1024 * 1024, 5))
//!         .level(Level::Info)
//!         .done()
//!     .build()?;
//!
//! logger.info("Application started");
//! logger.warn("Connection timeout");
//! logger.close()?;
//! # Ok::<(), strandlog::Error>(())
//! ```
//!
//! # Features
//!
//! - `cli` (default): the `strandlog` command-line tool

mod macros;

pub mod clock;
pub mod config;
mod error;
pub mod fmt;
pub mod global;
pub mod internal;
pub mod level;
pub mod logger;
pub mod record;
pub mod rotation;
pub mod sink;

#[cfg(feature = "cli")]
pub mod cli;

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::Config;
pub use error::Error;
pub use fmt::{DefaultFormatter, Formatter, MessageFormatter, PatternFormatter};
pub use level::Level;
pub use logger::{Logger, LoggerBuilder};
pub use record::{Location, Record};
pub use rotation::{RotationPolicy, RotationStrategy, format_size, parse_size};
pub use sink::{
    AsyncSink, ConsoleWriter, FileWriter, MemoryBuffer, OverflowPolicy, QueueConfig, QueueStats,
    RotatingFileWriter, ShutdownPolicy, Sink, SinkStatus, Stream, SyncSink, Target,
};
