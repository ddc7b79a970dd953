//! Per-level ANSI colors for terminal output.
//!
//! Only the console writer applies these; file writers strip every escape
//! sequence before persisting a line.

use crate::level::Level;

/// Terminates any active SGR styling so subsequent text returns to the terminal default.
pub const RESET: &str = "\x1b[0m";

pub const GREEN: &str = "\x1b[32m";
pub const YELLOW: &str = "\x1b[33m";
pub const RED: &str = "\x1b[31m";
pub const BOLD_RED: &str = "\x1b[1;31m";
pub const CYAN: &str = "\x1b[36m";
pub const BLUE: &str = "\x1b[34m";
pub const MAGENTA: &str = "\x1b[35m";

/// Escape sequence that opens a line of the given severity.
#[must_use]
pub const fn level_color(level: Level) -> &'static str {
    match level {
        Level::Debug => GREEN,
        Level::Info => RESET,
        Level::Warning => YELLOW,
        Level::Error => RED,
        Level::Fatal => BOLD_RED,
    }
}

/// Wraps `text` in `code` and a trailing reset.
#[must_use]
pub fn paint(text: &str, code: &str) -> String {
    format!("{code}{text}{RESET}")
}
