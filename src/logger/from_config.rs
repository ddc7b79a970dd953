//! Logger configuration from strandlog config files.

use super::{Logger, LoggerBuilder};
use crate::config::{Config, DispatchMode, parse_sink_level};
use crate::fmt::PatternFormatter;
use crate::internal;
use crate::level::Level;
use crate::sink::Stream;

impl Logger {
    /// Builds a logger from the config file at the default location.
    ///
    /// # Errors
    /// The config cannot be loaded, holds an invalid value, or a sink cannot
    /// be opened.
    pub fn from_default_config() -> Result<Self, crate::Error> {
        let config = Config::load()?;
        Self::from_config(&config)
    }

    /// Builds a logger from an already-loaded config.
    ///
    /// Every value is validated before the first file is opened.
    ///
    /// # Errors
    /// Invalid level, policy, size, or stream name, or a sink cannot be opened.
    pub fn from_config(config: &Config) -> Result<Self, crate::Error> {
        internal::debug("LOGGER", "Building logger from config");
        let level = config.level()?;
        internal::debug("LOGGER", &format!("Log level: {level}"));

        let mut builder = LoggerBuilder::new().level(level);
        builder = match config.dispatch_mode()? {
            DispatchMode::Async => builder.queue(config.queue_config()?),
            DispatchMode::Sync => builder.synchronous(),
        };

        let mut sinks: Vec<&str> = Vec::new();
        if config.console.enabled {
            builder = configure_console(builder, config)?;
            sinks.push("console");
        }
        if config.file.enabled {
            builder = configure_file(builder, config)?;
            sinks.push("file");
        }
        if config.rotating.enabled {
            builder = configure_rotating(builder, config)?;
            sinks.push("rotating");
        }

        if sinks.is_empty() {
            internal::warn("LOGGER", "No sinks enabled");
        } else {
            internal::debug("LOGGER", &format!("Sinks enabled: [{}]", sinks.join(", ")));
        }

        let logger = builder.build()?;
        internal::debug("LOGGER", "Logger ready");
        Ok(logger)
    }
}

fn configure_console(builder: LoggerBuilder, config: &Config) -> Result<LoggerBuilder, crate::Error> {
    let console = &config.console;
    let stream = match console.stream.to_lowercase().as_str() {
        "stdout" => Stream::Stdout,
        "stderr" => Stream::Stderr,
        other => {
            return Err(crate::Error::InvalidConfig(format!(
                "console.stream: unknown stream '{other}'"
            )));
        }
    };
    let level = parse_sink_level("console.level", console.level.as_deref())?;
    internal::debug(
        "CONSOLE",
        &format!(
            "Colors: {}",
            if console.colors { "enabled" } else { "disabled" }
        ),
    );

    let mut sink = builder
        .console()
        .stream(stream)
        .colors(console.colors)
        .level(level.unwrap_or(Level::Debug));
    if let Some(pattern) = &console.pattern {
        sink = sink.formatter(PatternFormatter::new(pattern));
    }
    Ok(sink.done())
}

fn configure_file(builder: LoggerBuilder, config: &Config) -> Result<LoggerBuilder, crate::Error> {
    let file = &config.file;
    let level = parse_sink_level("file.level", file.level.as_deref())?;
    internal::debug("FILE", &format!("Path: {}", file.path));

    let mut sink = builder.file(&file.path).level(level.unwrap_or(Level::Debug));
    if let Some(pattern) = &file.pattern {
        sink = sink.formatter(PatternFormatter::new(pattern));
    }
    Ok(sink.done())
}

fn configure_rotating(builder: LoggerBuilder, config: &Config) -> Result<LoggerBuilder, crate::Error> {
    let rotating = &config.rotating;
    let policy = config.rotation_policy()?;
    let level = parse_sink_level("rotating.level", rotating.level.as_deref())?;
    internal::debug(
        "ROTATE",
        &format!(
            "Path: {} ({}, keep {})",
            rotating.path, policy.strategy, policy.max_files
        ),
    );

    let mut sink = builder
        .rotating(&rotating.path, policy)
        .level(level.unwrap_or(Level::Debug));
    if let Some(pattern) = &rotating.pattern {
        sink = sink.formatter(PatternFormatter::new(pattern));
    }
    Ok(sink.done())
}
