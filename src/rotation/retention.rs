//! Archive listing and pruning down to the newest `max_files`.
//!
//! The directory may be modified concurrently (another process cleaning up,
//! an operator deleting by hand), so vanished files are never an error.

use super::naming::{archive_suffix, dir_of};
use crate::internal;
use std::cmp::Ordering;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Metadata captured at scan time; sorting and pruning act on this snapshot.
#[derive(Debug, Clone)]
pub struct ArchivedFile {
    pub path: PathBuf,
    pub size: u64,
    pub modified: SystemTime,
}

/// Outcome of one pruning pass.
#[derive(Debug, Default)]
pub struct PruneResult {
    /// Archives still on disk, newest first.
    pub kept: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    /// Files that could not be removed, with the reason.
    pub failed: Vec<(PathBuf, String)>,
}

/// Regular files next to `base` named `<base_name>.<suffix>`, newest first.
///
/// Only names rotation can produce qualify, so a sibling sharing the stem
/// (`app.err.log` or `app.toml` next to `app.log`) is never listed or pruned.
/// The active file itself is never listed.
///
/// # Errors
/// Fails only when the directory itself cannot be read.
pub fn list_archives(base: &Path) -> Result<Vec<ArchivedFile>, crate::Error> {
    let Some(base_name) = base.file_name().and_then(|n| n.to_str()) else {
        return Ok(Vec::new());
    };

    let mut files = Vec::new();
    for entry in fs::read_dir(dir_of(base))? {
        // Entries can disappear between readdir and stat
        let Ok(entry) = entry else { continue };
        let name = entry.file_name();
        let Some(name) = name.to_str() else { continue };
        if archive_suffix(base_name, name).is_none() {
            continue;
        }
        let Ok(meta) = entry.metadata() else { continue };
        if !meta.is_file() {
            continue;
        }
        files.push(ArchivedFile {
            path: entry.path(),
            size: meta.len(),
            modified: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
        });
    }

    files.sort_by(newest_first);
    Ok(files)
}

/// Modification time decides; equal timestamps (coarse filesystem clocks,
/// bursts of rotations) fall back to the name, where a longer name is a later
/// generation (`.10` after `.9`, `-120000.1` after `-120000`).
fn newest_first(a: &ArchivedFile, b: &ArchivedFile) -> Ordering {
    b.modified.cmp(&a.modified).then_with(|| {
        let an = a.path.file_name().unwrap_or_default();
        let bn = b.path.file_name().unwrap_or_default();
        bn.len().cmp(&an.len()).then_with(|| bn.cmp(an))
    })
}

/// Deletes the oldest archives of `base` until at most `max_files` remain.
///
/// `max_files = 0` removes every archive.
///
/// # Errors
/// Fails only when the directory cannot be listed; individual deletion
/// failures are recorded in the result and logged.
pub fn prune(base: &Path, max_files: usize) -> Result<PruneResult, crate::Error> {
    let mut files = list_archives(base)?;
    let mut result = PruneResult::default();

    while files.len() > max_files {
        let Some(oldest) = files.pop() else { break };
        match fs::remove_file(&oldest.path) {
            Ok(()) => {
                internal::debug(
                    "RETENTION",
                    &format!("Deleted {}", oldest.path.display()),
                );
                result.deleted.push(oldest.path);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                // Someone else got there first
            }
            Err(e) => {
                internal::warn(
                    "RETENTION",
                    &format!("Failed to delete {}: {e}", oldest.path.display()),
                );
                result.failed.push((oldest.path, e.to_string()));
            }
        }
    }

    result.kept = files.into_iter().map(|f| f.path).collect();
    Ok(result)
}
