//! Archive file names: `<base>.<generation>` for size rotation,
//! `<base>.<YYYYMMDD-HHMMSS>` for time rotation.

use super::RotationStrategy;
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// strftime pattern of time-based archive suffixes.
pub const TIMESTAMP_SUFFIX: &str = "%Y%m%d-%H%M%S";

/// Directory holding `base`; a bare file name lives in the current directory.
#[must_use]
pub fn dir_of(base: &Path) -> PathBuf {
    match base.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Name the active file is archived under at rotation time.
#[must_use]
pub fn archive_path(
    base: &Path,
    strategy: RotationStrategy,
    now: DateTime<Local>,
    generation: u64,
) -> PathBuf {
    let suffix = match strategy {
        RotationStrategy::BySize { .. } => generation.to_string(),
        RotationStrategy::Hourly | RotationStrategy::Daily => {
            now.format(TIMESTAMP_SUFFIX).to_string()
        }
    };
    with_suffix(base, &suffix)
}

/// Appends `.<suffix>` to the full path, keeping the existing extension.
#[must_use]
pub fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}

/// `path` itself if free, otherwise the first free `path.1`, `path.2`, ...
///
/// Two time-based rotations inside the same second would otherwise rename
/// over the earlier archive.
#[must_use]
pub fn unique_path(path: PathBuf) -> PathBuf {
    if !path.exists() {
        return path;
    }
    let mut n: u64 = 1;
    loop {
        let candidate = with_suffix(&path, &n.to_string());
        if !candidate.exists() {
            return candidate;
        }
        n += 1;
    }
}

/// The part of `name` after `<base_name>.`, if `name` is an archive of `base_name`.
#[must_use]
pub fn archive_suffix<'a>(base_name: &str, name: &'a str) -> Option<&'a str> {
    name.strip_prefix(base_name)?
        .strip_prefix('.')
        .filter(|s| !s.is_empty())
}

/// Highest numeric generation among existing `<base>.<N>` archives, 0 if none.
///
/// Size rotation resumes from here after a restart instead of reusing `.1`.
#[must_use]
pub fn highest_generation(base: &Path) -> u64 {
    let Some(base_name) = base.file_name().and_then(|n| n.to_str()) else {
        return 0;
    };
    let Ok(entries) = fs::read_dir(dir_of(base)) else {
        return 0;
    };

    entries
        .filter_map(Result::ok)
        .filter_map(|entry| {
            let name = entry.file_name();
            let name = name.to_str()?;
            archive_suffix(base_name, name)?.parse::<u64>().ok()
        })
        .max()
        .unwrap_or(0)
}
