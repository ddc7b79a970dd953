//! Rotating file writer: a plain `FileWriter` composed with the rotation
//! engine and the retention manager.
//!
//! Rotation is decided before each write, so the record that triggers it
//! always starts the new file. A failed rename or reopen is permanent: the
//! writer records the reason and refuses every later write rather than
//! touching a handle it no longer has.

use super::file::line_bytes;
use super::{FileWriter, RecordWriter};
use crate::clock::{Clock, SystemClock};
use crate::fmt::strip_ansi;
use crate::internal;
use crate::level::Level;
use crate::rotation::naming::unique_path;
use crate::rotation::{self, RotationPolicy, RotationState};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug)]
pub struct RotatingFileWriter {
    base: PathBuf,
    policy: RotationPolicy,
    state: RotationState,
    /// `None` only while rotating, or for good after a failed rotation.
    file: Option<FileWriter>,
    clock: Arc<dyn Clock>,
    /// Suffix the next size-based archive gets.
    next_generation: u64,
    rotations: u64,
    failure: Option<String>,
}

impl RotatingFileWriter {
    /// Opens (or creates) `base` with the wall clock.
    ///
    /// # Errors
    /// Invalid policy, or the file cannot be opened.
    pub fn open(base: impl AsRef<Path>, policy: RotationPolicy) -> Result<Self, crate::Error> {
        Self::with_clock(base, policy, Arc::new(SystemClock))
    }

    /// Opens `base` with an explicit time source.
    ///
    /// The byte tally starts from the existing file's size, so a restart
    /// doesn't let the file overshoot its threshold.
    ///
    /// # Errors
    /// Invalid policy, or the file cannot be opened.
    pub fn with_clock(
        base: impl AsRef<Path>,
        policy: RotationPolicy,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, crate::Error> {
        policy.validate()?;
        let file = FileWriter::open(base.as_ref())?;
        let base = file.path().to_path_buf();
        let existing = file.len_on_disk()?;
        let state = RotationState::new(policy.strategy, existing, clock.now());
        let next_generation = rotation::highest_generation(&base) + 1;

        internal::debug(
            "ROTATE",
            &format!(
                "Opened {} ({}, keep {}, {existing} bytes present)",
                base.display(),
                policy.strategy,
                policy.max_files
            ),
        );

        Ok(Self {
            base,
            policy,
            state,
            file: Some(file),
            clock,
            next_generation,
            rotations: 0,
            failure: None,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.base
    }

    #[must_use]
    pub const fn policy(&self) -> RotationPolicy {
        self.policy
    }

    /// Bytes written to the active file since it was last rotated.
    #[must_use]
    pub const fn current_size(&self) -> u64 {
        self.state.current_size()
    }

    /// When the next time-based rotation is due; `None` for size rotation.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<DateTime<Local>> {
        self.state.next_deadline()
    }

    #[must_use]
    pub const fn rotation_count(&self) -> u64 {
        self.rotations
    }

    /// Archives currently on disk, newest first.
    ///
    /// # Errors
    /// Directory listing failure.
    pub fn archives(&self) -> Result<Vec<PathBuf>, crate::Error> {
        Ok(rotation::list_archives(&self.base)?
            .into_iter()
            .map(|f| f.path)
            .collect())
    }

    /// Rolls the file over now, regardless of size or deadline.
    ///
    /// Returns the archive path, or `None` when the active file was empty and
    /// nothing needed archiving.
    ///
    /// # Errors
    /// Rename or reopen failure (the writer is then permanently failed), or
    /// the writer had already failed.
    pub fn rotate_now(&mut self) -> Result<Option<PathBuf>, crate::Error> {
        let now = self.clock.now();
        self.rotate_at(now)
    }

    fn rotate_at(&mut self, now: DateTime<Local>) -> Result<Option<PathBuf>, crate::Error> {
        if let Some(reason) = &self.failure {
            return Err(crate::Error::SinkFailed(reason.clone()));
        }

        if let Some(mut file) = self.file.take() {
            if let Err(e) = file.flush() {
                internal::warn("ROTATE", &format!("Flush before rotation failed: {e}"));
            }
        }

        // An empty file has nothing worth archiving
        let on_disk = fs::metadata(&self.base).map_or(0, |m| m.len());
        let archived = if on_disk > 0 {
            let target = unique_path(rotation::archive_path(
                &self.base,
                self.policy.strategy,
                now,
                self.next_generation,
            ));
            if let Err(e) = fs::rename(&self.base, &target) {
                return Err(self.fail(e));
            }
            if !self.policy.strategy.is_time_based() {
                self.next_generation += 1;
            }
            Some(target)
        } else {
            None
        };

        if archived.is_some() {
            // Retention problems never stop logging
            match rotation::prune(&self.base, self.policy.max_files) {
                Ok(result) if !result.deleted.is_empty() => internal::debug(
                    "RETENTION",
                    &format!("Pruned {} archive(s)", result.deleted.len()),
                ),
                Ok(_) => {}
                Err(e) => internal::warn("RETENTION", &format!("Cleanup skipped: {e}")),
            }
        }

        match FileWriter::create_truncated(&self.base) {
            Ok(file) => self.file = Some(file),
            Err(e) => return Err(self.fail(e)),
        }

        self.state.reset(now);
        self.rotations += 1;
        match &archived {
            Some(path) => internal::info(
                "ROTATE",
                &format!("{} -> {}", self.base.display(), path.display()),
            ),
            None => internal::debug("ROTATE", "Active file empty, nothing archived"),
        }
        Ok(archived)
    }

    fn fail(&mut self, source: io::Error) -> crate::Error {
        let reason = format!("rotation of {} failed: {source}", self.base.display());
        internal::error("ROTATE", &reason);
        self.failure = Some(reason);
        self.file = None;
        crate::Error::Rotation {
            path: self.base.clone(),
            source,
        }
    }
}

impl RecordWriter for RotatingFileWriter {
    fn write_line(&mut self, _level: Level, line: &str) -> Result<(), crate::Error> {
        if let Some(reason) = &self.failure {
            return Err(crate::Error::SinkFailed(reason.clone()));
        }

        let clean = strip_ansi(line);
        let incoming = line_bytes(&clean);
        let now = self.clock.now();
        if self.state.should_rotate(incoming, now) {
            self.rotate_at(now)?;
        }

        let Some(file) = self.file.as_mut() else {
            return Err(crate::Error::SinkFailed(format!(
                "{} is not open",
                self.base.display()
            )));
        };
        let written = file.append_clean(&clean)?;
        self.state.record_write(written);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), crate::Error> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }

    fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}
