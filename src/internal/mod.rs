//! strandlog's own diagnostic logger: rotation events, retention deletions,
//! dropped records, worker lifecycle, config loading.
//!
//! It writes synchronously to stderr through a plain console sink, never
//! through an async or file sink, so a failing sink can report about itself
//! without feeding records back into its own queue. `OnceLock` makes the
//! first `init` win; calls before any `init` are dropped silently.

use crate::config::Config;
use crate::fmt::PatternFormatter;
use crate::level::Level;
use crate::logger::Logger;
use crate::record::Record;
use crate::sink::{ConsoleWriter, Stream, SyncSink};
use std::sync::OnceLock;

static INTERNAL_LOGGER: OnceLock<Logger> = OnceLock::new();

const PATTERN: &str = "{timestamp} strandlog [{level}] {msg}";

/// Installs the diagnostics logger at `level`. Later calls are no-ops.
pub fn init(level: Level) {
    let was_init = INTERNAL_LOGGER.get().is_some();
    INTERNAL_LOGGER.get_or_init(|| build_internal_logger(level));
    if !was_init {
        debug("INTERNAL", &format!("Internal logger ready (level {level})"));
    }
}

/// Same as `init`, with the level taken from `[general] internal_level`.
pub fn init_with_config(config: &Config) {
    init(config.internal_level());
}

#[must_use]
pub fn is_initialized() -> bool {
    INTERNAL_LOGGER.get().is_some()
}

fn build_internal_logger(level: Level) -> Logger {
    let writer = ConsoleWriter::new().stream(Stream::Stderr).colors(false);
    let logger = Logger::new(level);
    logger.add_sink(SyncSink::new(writer).with_formatter(PatternFormatter::new(PATTERN)));
    logger
}

fn log(level: Level, scope: &str, msg: &str) {
    if let Some(logger) = INTERNAL_LOGGER.get() {
        if logger.enabled(level) {
            let record = Record::new(level, format!("{scope}: {msg}")).without_location();
            logger.dispatch(record);
        }
    }
}

pub fn debug(scope: &str, msg: &str) {
    log(Level::Debug, scope, msg);
}

pub fn info(scope: &str, msg: &str) {
    log(Level::Info, scope, msg);
}

pub fn warn(scope: &str, msg: &str) {
    log(Level::Warning, scope, msg);
}

pub fn error(scope: &str, msg: &str) {
    log(Level::Error, scope, msg);
}
