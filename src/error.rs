//! Unified error type for all strandlog operations.

use std::path::PathBuf;

/// Error type for strandlog operations.
#[derive(Debug)]
pub enum Error {
    /// I/O error outside of a rotation (open, write, flush).
    Io(std::io::Error),
    /// Rename or reopen failed while rolling a file over; the sink is now unusable.
    Rotation {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Invalid sink or policy parameters, rejected at construction time.
    InvalidConfig(String),
    /// The sink hit an unrecoverable failure earlier and refuses further writes.
    SinkFailed(String),
    /// A bounded queue was full and its overflow policy refused the record.
    QueueFull,
    /// The sink was closed before the record arrived.
    Closed,
    /// TOML config parsing error.
    ConfigParse(toml::de::Error),
    /// Config directory not found.
    ConfigDirNotFound,
    /// The process-wide logger was already installed.
    AlreadyInitialized,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Rotation { path, source } => {
                write!(f, "rotation failed for {}: {source}", path.display())
            }
            Self::InvalidConfig(s) => write!(f, "invalid configuration: {s}"),
            Self::SinkFailed(s) => write!(f, "sink failed: {s}"),
            Self::QueueFull => write!(f, "queue full, record rejected"),
            Self::Closed => write!(f, "sink closed"),
            Self::ConfigParse(e) => write!(f, "parse error: {e}"),
            Self::ConfigDirNotFound => write!(f, "config directory not found"),
            Self::AlreadyInitialized => write!(f, "global logger already initialized"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::Rotation { source: e, .. } => Some(e),
            Self::ConfigParse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Self::ConfigParse(e)
    }
}
