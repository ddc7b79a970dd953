//! Process-wide logger behind the `log!` family of macros.
//!
//! Installation is explicit: nothing is built lazily, and until `init` runs
//! every global call is a no-op. `shutdown` closes the sinks and uninstalls
//! the logger so a fresh one can be installed afterwards.

use crate::level::Level;
use crate::logger::Logger;
use crate::record::Record;
use std::sync::{Arc, PoisonError, RwLock};

static GLOBAL: RwLock<Option<Arc<Logger>>> = RwLock::new(None);

/// Installs `logger` as the process-wide default.
///
/// # Errors
/// `AlreadyInitialized` if a logger is installed; the new one is dropped.
pub fn init(logger: Logger) -> Result<(), crate::Error> {
    let mut slot = GLOBAL.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        return Err(crate::Error::AlreadyInitialized);
    }
    *slot = Some(Arc::new(logger));
    Ok(())
}

/// Uninstalls the global logger and closes its sinks, draining them per
/// their shutdown policy. Does nothing if none is installed.
///
/// # Errors
/// The first error any sink reported while closing.
pub fn shutdown() -> Result<(), crate::Error> {
    let taken = GLOBAL.write().unwrap_or_else(PoisonError::into_inner).take();
    taken.map_or(Ok(()), |logger| logger.close())
}

/// Handle to the installed logger, if any.
#[must_use]
pub fn get() -> Option<Arc<Logger>> {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner).clone()
}

#[must_use]
pub fn is_initialized() -> bool {
    GLOBAL.read().unwrap_or_else(PoisonError::into_inner).is_some()
}

/// Whether a record at `level` would pass the global logger's gate.
#[must_use]
pub fn enabled(level: Level) -> bool {
    GLOBAL
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .as_ref()
        .is_some_and(|logger| logger.enabled(level))
}

#[must_use]
pub fn level() -> Option<Level> {
    get().map(|logger| logger.level())
}

pub fn set_level(level: Level) {
    if let Some(logger) = get() {
        logger.set_level(level);
    }
}

/// # Errors
/// The first error any sink returned; `Ok` when no logger is installed.
pub fn flush() -> Result<(), crate::Error> {
    get().map_or(Ok(()), |logger| logger.flush())
}

#[track_caller]
pub fn log(level: Level, text: &str) {
    if let Some(logger) = get() {
        logger.log(level, text);
    }
}

/// Entry point of the macros: the record is only built once the level passed.
pub fn log_record(record: Record) {
    if let Some(logger) = get() {
        logger.dispatch(record);
    }
}

#[track_caller]
pub fn debug(text: &str) {
    log(Level::Debug, text);
}

#[track_caller]
pub fn info(text: &str) {
    log(Level::Info, text);
}

#[track_caller]
pub fn warn(text: &str) {
    log(Level::Warning, text);
}

#[track_caller]
pub fn error(text: &str) {
    log(Level::Error, text);
}

#[track_caller]
pub fn fatal(text: &str) {
    log(Level::Fatal, text);
}
