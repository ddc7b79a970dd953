//! Stepwise construction of a `Logger`.
//!
//! Sub-builders only record what was asked for; files are opened and worker
//! threads started in `build`, so a bad path surfaces as one `Result` instead
//! of half-built sinks.

use super::Logger;
use crate::clock::Clock;
use crate::fmt::{Formatter, PatternFormatter};
use crate::level::Level;
use crate::rotation::RotationPolicy;
use crate::sink::{
    AsyncSink, ConsoleWriter, FileWriter, QueueConfig, RotatingFileWriter, Sink, Stream, SyncSink,
    Target,
};
use std::path::PathBuf;
use std::sync::Arc;

enum PendingTarget {
    Console(ConsoleWriter),
    File(PathBuf),
    Rotating {
        path: PathBuf,
        policy: RotationPolicy,
        clock: Option<Arc<dyn Clock>>,
    },
    Custom(Arc<dyn Sink>),
}

struct Pending {
    target: PendingTarget,
    level: Option<Level>,
    formatter: Option<Arc<dyn Formatter>>,
}

impl Pending {
    const fn new(target: PendingTarget) -> Self {
        Self {
            target,
            level: None,
            formatter: None,
        }
    }

    const fn kind(&self) -> &'static str {
        match self.target {
            PendingTarget::Console(_) => "console",
            PendingTarget::File(_) => "file",
            PendingTarget::Rotating { .. } => "rotating",
            PendingTarget::Custom(_) => "custom",
        }
    }
}

pub struct LoggerBuilder {
    min_level: Level,
    /// `None` builds synchronous sinks.
    queue: Option<QueueConfig>,
    pending: Vec<Pending>,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoggerBuilder {
    /// Info level, asynchronous sinks with the default queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_level: Level::Info,
            queue: Some(QueueConfig::default()),
            pending: Vec::new(),
        }
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.min_level = level;
        self
    }

    /// Queue settings shared by every sink.
    #[must_use]
    pub const fn queue(mut self, config: QueueConfig) -> Self {
        self.queue = Some(config);
        self
    }

    /// Write on the caller's thread instead of a worker per sink.
    #[must_use]
    pub const fn synchronous(mut self) -> Self {
        self.queue = None;
        self
    }

    #[must_use]
    pub fn console(self) -> ConsoleBuilder {
        ConsoleBuilder {
            parent: self,
            writer: ConsoleWriter::new(),
            level: None,
            formatter: None,
        }
    }

    #[must_use]
    pub fn file(self, path: impl Into<PathBuf>) -> FileBuilder {
        FileBuilder {
            parent: self,
            path: path.into(),
            level: None,
            formatter: None,
        }
    }

    #[must_use]
    pub fn rotating(self, path: impl Into<PathBuf>, policy: RotationPolicy) -> RotatingBuilder {
        RotatingBuilder {
            parent: self,
            path: path.into(),
            policy,
            clock: None,
            level: None,
            formatter: None,
        }
    }

    /// Attaches an already-constructed sink as-is.
    #[must_use]
    pub fn sink(mut self, sink: impl Sink + 'static) -> Self {
        self.pending
            .push(Pending::new(PendingTarget::Custom(Arc::new(sink))));
        self
    }

    /// Opens every destination and starts the workers.
    ///
    /// # Errors
    /// A file could not be opened, a rotation policy is invalid, or a worker
    /// thread could not be spawned. Sinks opened before the failure are closed.
    pub fn build(self) -> Result<Logger, crate::Error> {
        let logger = Logger::new(self.min_level);
        for (index, pending) in self.pending.into_iter().enumerate() {
            let name = format!("{}-{index}", pending.kind());
            let sink = open_sink(name, pending, self.queue)?;
            logger.add_shared(sink);
        }
        Ok(logger)
    }

    fn push(mut self, pending: Pending) -> Self {
        self.pending.push(pending);
        self
    }
}

fn open_sink(
    name: String,
    pending: Pending,
    queue: Option<QueueConfig>,
) -> Result<Arc<dyn Sink>, crate::Error> {
    let target: Target = match pending.target {
        PendingTarget::Custom(sink) => return Ok(sink),
        PendingTarget::Console(writer) => writer.into(),
        PendingTarget::File(path) => FileWriter::open(path)?.into(),
        PendingTarget::Rotating {
            path,
            policy,
            clock: Some(clock),
        } => RotatingFileWriter::with_clock(path, policy, clock)?.into(),
        PendingTarget::Rotating { path, policy, .. } => {
            RotatingFileWriter::open(path, policy)?.into()
        }
    };

    let sink: Arc<dyn Sink> = match queue {
        Some(config) => Arc::new(AsyncSink::new(name, target, config)?),
        None => Arc::new(SyncSink::new(target)),
    };
    if let Some(level) = pending.level {
        sink.set_level(level);
    }
    if let Some(formatter) = pending.formatter {
        sink.set_formatter(formatter);
    }
    Ok(sink)
}

pub struct ConsoleBuilder {
    parent: LoggerBuilder,
    writer: ConsoleWriter,
    level: Option<Level>,
    formatter: Option<Arc<dyn Formatter>>,
}

impl ConsoleBuilder {
    #[must_use]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.writer = self.writer.colors(enabled);
        self
    }

    #[must_use]
    pub fn stream(mut self, stream: Stream) -> Self {
        self.writer = self.writer.stream(stream);
        self
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    /// Shorthand for a `PatternFormatter`.
    #[must_use]
    pub fn pattern(self, pattern: &str) -> Self {
        self.formatter(PatternFormatter::new(pattern))
    }

    /// Sub-builder consumes self, so there must be a way back to chain more sinks.
    #[must_use]
    pub fn done(self) -> LoggerBuilder {
        self.parent.push(Pending {
            target: PendingTarget::Console(self.writer),
            level: self.level,
            formatter: self.formatter,
        })
    }
}

pub struct FileBuilder {
    parent: LoggerBuilder,
    path: PathBuf,
    level: Option<Level>,
    formatter: Option<Arc<dyn Formatter>>,
}

impl FileBuilder {
    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use]
    pub fn pattern(self, pattern: &str) -> Self {
        self.formatter(PatternFormatter::new(pattern))
    }

    #[must_use]
    pub fn done(self) -> LoggerBuilder {
        self.parent.push(Pending {
            target: PendingTarget::File(self.path),
            level: self.level,
            formatter: self.formatter,
        })
    }
}

pub struct RotatingBuilder {
    parent: LoggerBuilder,
    path: PathBuf,
    policy: RotationPolicy,
    clock: Option<Arc<dyn Clock>>,
    level: Option<Level>,
    formatter: Option<Arc<dyn Formatter>>,
}

impl RotatingBuilder {
    /// Time source for deadlines and archive names; the wall clock by default.
    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    #[must_use]
    pub const fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl Formatter + 'static) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    #[must_use]
    pub fn pattern(self, pattern: &str) -> Self {
        self.formatter(PatternFormatter::new(pattern))
    }

    #[must_use]
    pub fn done(self) -> LoggerBuilder {
        self.parent.push(Pending {
            target: PendingTarget::Rotating {
                path: self.path,
                policy: self.policy,
                clock: self.clock,
            },
            level: self.level,
            formatter: self.formatter,
        })
    }
}
