//! Pipe command implementation.

use crate::cli::PipeArgs;
use crate::fmt::{MessageFormatter, PatternFormatter};
use crate::internal;
use crate::level::Level;
use crate::record::Record;
use crate::sink::{AsyncSink, QueueConfig, QueueStats, RotatingFileWriter, Sink};
use std::io::{self, BufRead};
use std::process::ExitCode;
use std::sync::Arc;

/// Handles `strandlog pipe <PATH> [options]`.
#[must_use]
pub fn cmd_pipe(args: &PipeArgs) -> ExitCode {
    match run(args) {
        Ok(stats) => {
            if args.stats {
                print_stats(&stats);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            internal::error("PIPE", &format!("{e}"));
            eprintln!("strandlog: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &PipeArgs) -> Result<QueueStats, crate::Error> {
    let policy = args.policy()?;
    let writer = RotatingFileWriter::open(&args.path, policy)?;
    let queue = QueueConfig::default()
        .capacity(args.capacity)
        .overflow(args.overflow.into());
    let sink = AsyncSink::new("pipe", writer, queue)?;
    match &args.pattern {
        Some(pattern) => sink.set_formatter(Arc::new(PatternFormatter::new(pattern))),
        None => sink.set_formatter(Arc::new(MessageFormatter)),
    }

    let level = Level::from(args.level);
    for line in io::stdin().lock().lines() {
        let line = line?;
        match sink.submit(Record::new(level, line).without_location()) {
            // Counted by the sink; keep reading
            Ok(()) | Err(crate::Error::QueueFull) => {}
            Err(e) => {
                let _ = sink.close();
                return Err(e);
            }
        }
    }

    sink.close()?;
    Ok(sink.stats())
}

fn print_stats(stats: &QueueStats) {
    eprintln!("submitted:        {}", stats.submitted);
    eprintln!("written:          {}", stats.written);
    eprintln!("dropped_overflow: {}", stats.dropped_overflow);
    eprintln!("dropped_closed:   {}", stats.dropped_closed);
    eprintln!("discarded:        {}", stats.discarded);
    eprintln!("failed:           {}", stats.failed);
}
