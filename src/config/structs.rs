//! Configuration struct definitions.

use serde::Deserialize;

/// General configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Facade level, the first gate before any sink sees a record.
    pub level: String,
    /// Level of strandlog's own diagnostics on stderr.
    pub internal_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            internal_level: "warn".to_string(),
        }
    }
}

/// How sinks hand records to their writers.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// `async` (worker thread per sink) or `sync` (caller's thread).
    pub mode: String,
    /// Queue bound in records; 0 means unbounded.
    pub capacity: usize,
    /// `block`, `drop_oldest`, or `reject`.
    pub overflow: String,
    /// `drain` or `discard`.
    pub on_close: String,
    /// Flush after every record rather than when the queue runs dry.
    pub flush_each: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            mode: "async".to_string(),
            capacity: crate::sink::DEFAULT_CAPACITY,
            overflow: "block".to_string(),
            on_close: "drain".to_string(),
            flush_each: false,
        }
    }
}

/// Console sink configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub enabled: bool,
    pub colors: bool,
    /// `stdout` or `stderr`.
    pub stream: String,
    /// Sink level; unset accepts everything the facade lets through.
    pub level: Option<String>,
    /// Line template; unset uses the default layout.
    pub pattern: Option<String>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            colors: true,
            stream: "stdout".to_string(),
            level: None,
            pattern: None,
        }
    }
}

/// Plain file sink configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub enabled: bool,
    /// Supports `~`.
    pub path: String,
    pub level: Option<String>,
    pub pattern: Option<String>,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path("strandlog.log"),
            level: None,
            pattern: None,
        }
    }
}

/// Rotating file sink configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RotatingConfig {
    pub enabled: bool,
    /// Active file; archives are created next to it.
    pub path: String,
    /// `size`, `hourly`, or `daily`.
    pub strategy: String,
    /// Threshold for `size`, e.g. "10M" or "512K".
    pub max_size: String,
    /// Archives kept after each rotation.
    pub max_files: usize,
    pub level: Option<String>,
    pub pattern: Option<String>,
}

impl Default for RotatingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            path: default_log_path("rotating.log"),
            strategy: "size".to_string(),
            max_size: "10M".to_string(),
            max_files: crate::rotation::DEFAULT_MAX_FILES,
            level: None,
            pattern: None,
        }
    }
}

/// `<state_dir>/logs/<name>`, falling back to the data dir, then to `logs/<name>`.
fn default_log_path(name: &str) -> String {
    directories::ProjectDirs::from("", "", "strandlog").map_or_else(
        || format!("logs/{name}"),
        |dirs| {
            dirs.state_dir()
                .unwrap_or_else(|| dirs.data_dir())
                .join("logs")
                .join(name)
                .to_string_lossy()
                .into_owned()
        },
    )
}
