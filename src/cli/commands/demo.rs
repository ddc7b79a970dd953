//! Demo command implementation.

use crate::fmt::DefaultFormatter;
use crate::internal;
use crate::level::Level;
use crate::logger::Logger;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::thread;

const WORKERS: usize = 3;

/// Handles `strandlog demo [--file PATH]`: every level from the main thread,
/// then a few named threads logging concurrently.
#[must_use]
pub fn cmd_demo(file: &Path) -> ExitCode {
    let logger = match Logger::builder()
        .level(Level::Debug)
        .console()
        .formatter(DefaultFormatter::colored())
        .done()
        .file(file)
        .done()
        .build()
    {
        Ok(logger) => Arc::new(logger),
        Err(e) => {
            internal::error("DEMO", &format!("{e}"));
            eprintln!("strandlog: {e}");
            return ExitCode::FAILURE;
        }
    };

    logger.debug("Debugging details");
    logger.info("Service started");
    logger.warn("Disk usage at 85%");
    logger.error("Request failed");
    logger.fatal("Unrecoverable state");

    let handles: Vec<_> = (0..WORKERS)
        .filter_map(|n| {
            let logger = Arc::clone(&logger);
            thread::Builder::new()
                .name(format!("worker-{n}"))
                .spawn(move || {
                    for i in 0..3 {
                        logger.info(&format!("worker {n} step {i}"));
                    }
                })
                .ok()
        })
        .collect();
    for handle in handles {
        let _ = handle.join();
    }

    match logger.close() {
        Ok(()) => {
            println!("Demo log written to {}", file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("strandlog: {e}");
            ExitCode::FAILURE
        }
    }
}
