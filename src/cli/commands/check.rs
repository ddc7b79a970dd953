//! Check command implementation.

use crate::config::{Config, DispatchMode};
use crate::rotation::format_size;
use crate::rotation::RotationStrategy;
use std::process::ExitCode;

/// Handles `strandlog check`: resolves every setting the way
/// `Logger::from_config` would, without opening any file.
#[must_use]
pub fn cmd_check(config: &Config) -> ExitCode {
    match summarize(config) {
        Ok(lines) => {
            for line in lines {
                println!("{line}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("strandlog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn summarize(config: &Config) -> Result<Vec<String>, crate::Error> {
    let mut lines = vec![
        format!("level:    {}", config.level()?),
        format!("internal: {}", config.internal_level()),
    ];

    match config.dispatch_mode()? {
        DispatchMode::Sync => lines.push("dispatch: sync".to_string()),
        DispatchMode::Async => {
            let queue = config.queue_config()?;
            let capacity = if queue.is_bounded() {
                queue.capacity.to_string()
            } else {
                "unbounded".to_string()
            };
            lines.push(format!(
                "dispatch: async (capacity {capacity}, overflow {}, on close {})",
                queue.overflow, queue.on_close
            ));
        }
    }

    if config.console.enabled {
        lines.push(format!("console:  {} (colors {})", config.console.stream, config.console.colors));
    }
    if config.file.enabled {
        lines.push(format!("file:     {}", config.file.path));
    }
    if config.rotating.enabled {
        let policy = config.rotation_policy()?;
        let trigger = match policy.strategy {
            RotationStrategy::BySize { max_bytes } => format!("at {}", format_size(max_bytes)),
            other => other.as_str().to_string(),
        };
        lines.push(format!(
            "rotating: {} ({trigger}, keep {})",
            config.rotating.path, policy.max_files
        ));
    }
    Ok(lines)
}
