//! TOML configuration loading and conversion into typed settings.
//!
//! The serde schema in `structs` keeps every value as the user wrote it;
//! the `Config` accessors turn those strings into levels, policies, and
//! queue settings, failing with `InvalidConfig` instead of guessing.

mod structs;

pub use structs::{ConsoleConfig, DispatchConfig, FileConfig, GeneralConfig, RotatingConfig};

use crate::internal;
use crate::level::Level;
use crate::rotation::{RotationPolicy, RotationStrategy, parse_size};
use crate::sink::{OverflowPolicy, QueueConfig, ShutdownPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// An empty file is a valid config: `#[serde(default)]` everywhere yields a
/// single colored console sink.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub dispatch: DispatchConfig,
    pub console: ConsoleConfig,
    pub file: FileConfig,
    pub rotating: RotatingConfig,
}

/// Whether sinks get a worker thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Async,
    Sync,
}

impl Config {
    /// Loads the config from the default location, or defaults if there is none.
    ///
    /// # Errors
    /// No config directory on this platform, unreadable file, or invalid TOML.
    pub fn load() -> Result<Self, crate::Error> {
        internal::debug("CONFIG", "Loading config from default location");
        let path = Self::get_config_path()?;
        let config = Self::load_from(&path)?;
        internal::info("CONFIG", &format!("Config loaded from {}", path.display()));
        Ok(config)
    }

    /// Loads `path`; a missing file yields the defaults.
    ///
    /// # Errors
    /// Unreadable file or invalid TOML.
    pub fn load_from(path: &Path) -> Result<Self, crate::Error> {
        if !path.exists() {
            internal::debug("CONFIG", "Config file not found, using defaults");
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// # Errors
    /// Invalid TOML or a value of the wrong type.
    pub fn parse(content: &str) -> Result<Self, crate::Error> {
        let config = toml::from_str(content)?;
        Ok(config)
    }

    /// `<config_dir>/strandlog/strandlog.toml`.
    ///
    /// # Errors
    /// The platform has no config directory.
    pub fn get_config_path() -> Result<PathBuf, crate::Error> {
        directories::BaseDirs::new()
            .map(|dirs| dirs.config_dir().join("strandlog").join("strandlog.toml"))
            .ok_or(crate::Error::ConfigDirNotFound)
    }

    /// # Errors
    /// Unknown level name.
    pub fn level(&self) -> Result<Level, crate::Error> {
        parse_level("general.level", &self.general.level)
    }

    /// Falls back to `Warning` on a bad name; the internal logger starts
    /// before anyone could report the problem.
    #[must_use]
    pub fn internal_level(&self) -> Level {
        self.general.internal_level.parse().unwrap_or(Level::Warning)
    }

    /// # Errors
    /// Unknown mode.
    pub fn dispatch_mode(&self) -> Result<DispatchMode, crate::Error> {
        match self.dispatch.mode.to_lowercase().as_str() {
            "async" => Ok(DispatchMode::Async),
            "sync" => Ok(DispatchMode::Sync),
            other => Err(crate::Error::InvalidConfig(format!(
                "dispatch.mode: unknown mode '{other}'"
            ))),
        }
    }

    /// # Errors
    /// Unknown overflow or shutdown policy.
    pub fn queue_config(&self) -> Result<QueueConfig, crate::Error> {
        let overflow: OverflowPolicy = self.dispatch.overflow.parse()?;
        let on_close: ShutdownPolicy = self.dispatch.on_close.parse()?;
        Ok(QueueConfig::default()
            .capacity(self.dispatch.capacity)
            .overflow(overflow)
            .on_close(on_close)
            .flush_each(self.dispatch.flush_each))
    }

    /// # Errors
    /// Unknown strategy, unparseable size, or a zero size threshold.
    pub fn rotation_policy(&self) -> Result<RotationPolicy, crate::Error> {
        let strategy = match self.rotating.strategy.parse()? {
            RotationStrategy::BySize { .. } => {
                let max_bytes = parse_size(&self.rotating.max_size).ok_or_else(|| {
                    crate::Error::InvalidConfig(format!(
                        "rotating.max_size: cannot parse '{}'",
                        self.rotating.max_size
                    ))
                })?;
                RotationStrategy::BySize { max_bytes }
            }
            other => other,
        };
        let policy = RotationPolicy {
            strategy,
            max_files: self.rotating.max_files,
        };
        policy.validate()?;
        Ok(policy)
    }
}

/// Sink-level override; `None` means the sink accepts every level.
///
/// # Errors
/// Unknown level name.
pub fn parse_sink_level(key: &str, value: Option<&str>) -> Result<Option<Level>, crate::Error> {
    value.map(|v| parse_level(key, v)).transpose()
}

fn parse_level(key: &str, value: &str) -> Result<Level, crate::Error> {
    value
        .parse()
        .map_err(|e| crate::Error::InvalidConfig(format!("{key}: {e}")))
}
