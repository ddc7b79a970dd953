//! Plain file writer: append-create, escapes stripped.

use super::RecordWriter;
use crate::fmt::strip_ansi;
use crate::internal;
use crate::level::Level;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Buffered append handle on one file.
#[derive(Debug)]
pub struct FileWriter {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileWriter {
    /// Opens `path` for appending, creating it and any missing parent directories.
    ///
    /// # Errors
    /// Directory creation or open failure.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, crate::Error> {
        let path = expand(path.as_ref());

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                match fs::create_dir_all(parent) {
                    Ok(()) => {
                        internal::debug("FILE", &format!("Created directory: {}", parent.display()));
                    }
                    Err(e) => {
                        internal::error(
                            "FILE",
                            &format!("Failed to create directory {}: {e}", parent.display()),
                        );
                        return Err(e.into());
                    }
                }
            }
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        internal::debug("FILE", &format!("Opened {}", path.display()));
        Ok(Self {
            path,
            writer: BufWriter::new(file),
        })
    }

    /// Opens `path` as a fresh empty file. Never creates directories: if the
    /// directory vanished the caller must learn about it.
    ///
    /// # Errors
    /// The raw open error, so rotation can report which path failed.
    pub fn create_truncated(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the file on disk, not counting unflushed bytes.
    ///
    /// # Errors
    /// Metadata lookup failure.
    pub fn len_on_disk(&self) -> io::Result<u64> {
        Ok(self.writer.get_ref().metadata()?.len())
    }

    /// Writes `line` plus a newline, escapes removed; returns the bytes written.
    ///
    /// # Errors
    /// Write failure.
    pub fn append(&mut self, line: &str) -> io::Result<u64> {
        self.append_clean(&strip_ansi(line))
    }

    /// Writes an already stripped `clean` line plus a newline.
    pub(crate) fn append_clean(&mut self, clean: &str) -> io::Result<u64> {
        self.writer.write_all(clean.as_bytes())?;
        self.writer.write_all(b"\n")?;
        Ok(line_bytes(clean))
    }
}

/// Bytes a stripped line occupies on disk, newline included.
pub(crate) const fn line_bytes(clean: &str) -> u64 {
    clean.len() as u64 + 1
}

impl RecordWriter for FileWriter {
    fn write_line(&mut self, _level: Level, line: &str) -> Result<(), crate::Error> {
        self.append(line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), crate::Error> {
        self.writer.flush()?;
        Ok(())
    }
}

/// `~/logs/app.log` is the natural way to write a path in a config file.
pub(crate) fn expand(path: &Path) -> PathBuf {
    path.to_str().map_or_else(
        || path.to_path_buf(),
        |s| PathBuf::from(shellexpand::tilde(s).into_owned()),
    )
}
