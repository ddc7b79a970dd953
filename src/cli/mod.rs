//! CLI module for strandlog.
//!
//! This module provides the command-line interface using Clap.

pub mod commands;

use crate::level::Level;
use crate::rotation::{RotationPolicy, RotationStrategy, parse_size};
use crate::sink::OverflowPolicy;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Log level for CLI arguments.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warning,
            LogLevel::Error => Self::Error,
            LogLevel::Fatal => Self::Fatal,
        }
    }
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum StrategyArg {
    Size,
    Hourly,
    Daily,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OverflowArg {
    Block,
    DropOldest,
    Reject,
}

impl From<OverflowArg> for OverflowPolicy {
    fn from(arg: OverflowArg) -> Self {
        match arg {
            OverflowArg::Block => Self::Block,
            OverflowArg::DropOldest => Self::DropOldest,
            OverflowArg::Reject => Self::Reject,
        }
    }
}

/// strandlog - Asynchronous logging with rotating files.
#[derive(Parser)]
#[command(
    name = "strandlog",
    version,
    about = "Asynchronous logging with rotating files"
)]
pub struct Cli {
    /// Config file (defaults to the user config directory)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// Print strandlog's own diagnostics down to debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Write stdin, line by line, into a rotating log file.
    Pipe(PipeArgs),
    /// Emit records at every level to the console and a file.
    Demo {
        /// File sink path
        #[arg(long, value_name = "PATH", default_value = "strandlog-demo.log")]
        file: PathBuf,
    },
    /// Validate a config file and print the effective settings.
    Check,
}

#[derive(Debug, Args)]
pub struct PipeArgs {
    /// Active log file; archives are created next to it
    pub path: PathBuf,
    #[arg(long, value_enum, default_value = "size")]
    pub strategy: StrategyArg,
    /// Size threshold for the size strategy (e.g. "512K", "10M")
    #[arg(long, value_name = "SIZE", default_value = "10M")]
    pub max_size: String,
    /// Archives kept after each rotation
    #[arg(long, value_name = "N", default_value_t = crate::rotation::DEFAULT_MAX_FILES)]
    pub max_files: usize,
    /// Level stamped on every line
    #[arg(long, value_enum, default_value = "info")]
    pub level: LogLevel,
    /// Line template; the raw line when omitted
    #[arg(long)]
    pub pattern: Option<String>,
    /// Queue bound in records; 0 for unbounded
    #[arg(long, value_name = "N", default_value_t = crate::sink::DEFAULT_CAPACITY)]
    pub capacity: usize,
    #[arg(long, value_enum, default_value = "block")]
    pub overflow: OverflowArg,
    /// Print queue statistics to stderr on exit
    #[arg(long)]
    pub stats: bool,
}

impl PipeArgs {
    /// # Errors
    /// Unparseable or zero size threshold.
    pub fn policy(&self) -> Result<RotationPolicy, crate::Error> {
        let strategy = match self.strategy {
            StrategyArg::Size => RotationStrategy::BySize {
                max_bytes: parse_size(&self.max_size).ok_or_else(|| {
                    crate::Error::InvalidConfig(format!("cannot parse size '{}'", self.max_size))
                })?,
            },
            StrategyArg::Hourly => RotationStrategy::Hourly,
            StrategyArg::Daily => RotationStrategy::Daily,
        };
        let policy = RotationPolicy {
            strategy,
            max_files: self.max_files,
        };
        policy.validate()?;
        Ok(policy)
    }
}

pub use commands::{cmd_check, cmd_demo, cmd_pipe};
