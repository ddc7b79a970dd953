//! `strandlog` binary: pipe stdin into rotating files, run the demo, or
//! validate a config.
//!
//! Usage:
//!   strandlog pipe <PATH> [--strategy size|hourly|daily] [--max-size 10M]
//!                         [--max-files 5] [--overflow block|drop-oldest|reject] [--stats]
//!   strandlog demo [--file PATH]
//!   strandlog check [--config PATH]

use clap::Parser;
use strandlog::cli::{Cli, Command, cmd_check, cmd_demo, cmd_pipe};
use strandlog::config::Config;
use strandlog::internal;
use strandlog::level::Level;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };

    // Only `check` needs a valid config; the other commands take their settings from flags
    let config = match (loaded, &cli.command) {
        (Ok(config), _) => config,
        (Err(e), Command::Check) => {
            eprintln!("strandlog: {e}");
            return ExitCode::FAILURE;
        }
        (Err(e), _) => {
            eprintln!("strandlog: ignoring config: {e}");
            Config::default()
        }
    };

    if cli.verbose {
        internal::init(Level::Debug);
    } else {
        internal::init_with_config(&config);
    }

    match &cli.command {
        Command::Pipe(args) => cmd_pipe(args),
        Command::Demo { file } => cmd_demo(file),
        Command::Check => cmd_check(&config),
    }
}
