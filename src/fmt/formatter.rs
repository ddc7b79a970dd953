//! Turns a record into the line a sink writes. Sinks hold one formatter each
//! and can have it swapped at runtime.

use super::FormatTemplate;
use super::color::{self, BLUE, CYAN, MAGENTA, RESET};
use crate::record::Record;
use std::fmt::{self, Write};

/// `Send + Sync` because async sinks format on their worker thread.
pub trait Formatter: Send + Sync + fmt::Debug {
    /// Renders one record without a trailing newline; writers add the line terminator.
    fn format(&self, record: &Record) -> String;
}

/// Emits the record text unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageFormatter;

impl Formatter for MessageFormatter {
    fn format(&self, record: &Record) -> String {
        record.text.clone()
    }
}

/// `2024-05-01 12:00:00 [INFO] <main.rs:42> (Thread main) message`
///
/// With colors enabled each field gets its own escape code; file writers strip
/// them again, so the same formatter can feed console and file sinks.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormatter {
    colors: bool,
}

impl DefaultFormatter {
    #[must_use]
    pub const fn new() -> Self {
        Self { colors: false }
    }

    #[must_use]
    pub const fn colored() -> Self {
        Self { colors: true }
    }
}

impl Formatter for DefaultFormatter {
    fn format(&self, record: &Record) -> String {
        let (cyan, blue, magenta, reset) = if self.colors {
            (CYAN, BLUE, MAGENTA, RESET)
        } else {
            ("", "", "", "")
        };
        let level_color = if self.colors {
            color::level_color(record.level)
        } else {
            ""
        };

        let mut out = String::with_capacity(record.text.len() + 64);
        let _ = write!(
            out,
            "{cyan}{}{reset} {level_color}[{}]{reset} ",
            record.timestamp.format(FormatTemplate::DEFAULT_TIMESTAMP),
            record.level,
        );
        if let Some(loc) = record.location {
            let _ = write!(out, "{blue}<{}:{}>{reset} ", loc.file_name(), loc.line);
        }
        let _ = write!(
            out,
            "{magenta}(Thread {}){reset} {level_color}{}{reset}",
            record.thread, record.text
        );
        out
    }
}

/// Template-driven layout, e.g. `"{timestamp} {level} {file}:{line} {msg}"`.
#[derive(Debug, Clone)]
pub struct PatternFormatter {
    template: FormatTemplate,
}

impl PatternFormatter {
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        Self {
            template: FormatTemplate::parse(pattern),
        }
    }

    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.template = self.template.timestamp_format(format);
        self
    }
}

impl Default for PatternFormatter {
    fn default() -> Self {
        Self {
            template: FormatTemplate::default(),
        }
    }
}

impl Formatter for PatternFormatter {
    fn format(&self, record: &Record) -> String {
        self.template.render(record)
    }
}
