//! Rendering records into lines: templates, level colors, and the escape
//! stripping that keeps persisted files clean.

pub mod ansi;
pub mod color;
mod format;
mod formatter;

pub use ansi::{has_ansi, strip_ansi};
pub use format::{FormatSegment, FormatTemplate, Placeholder};
pub use formatter::{DefaultFormatter, Formatter, MessageFormatter, PatternFormatter};
