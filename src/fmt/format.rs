//! Line templates such as `{timestamp} [{level}] {msg}`, parsed once and
//! rendered per record.

use crate::record::Record;
use std::fmt::Write;

/// Known substitution tokens. Unknown `{names}` pass through as literal text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placeholder {
    Timestamp,
    Level,
    File,
    Line,
    Thread,
    Msg,
}

impl Placeholder {
    /// Template parsing needs to match brace-delimited names against known placeholders.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Timestamp => "timestamp",
            Self::Level => "level",
            Self::File => "file",
            Self::Line => "line",
            Self::Thread => "thread",
            Self::Msg => "msg",
        }
    }

    pub const ALL: &'static [Self] = &[
        Self::Timestamp,
        Self::Level,
        Self::File,
        Self::Line,
        Self::Thread,
        Self::Msg,
    ];
}

/// Parsing into segments once avoids re-scanning the template on every record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatSegment {
    /// Whitespace, separators, and unknown `{names}` pass through untouched.
    Literal(String),
    /// Known tokens are substituted from the record at render time.
    Placeholder(Placeholder),
}

/// Pre-parsed template.
#[derive(Debug, Clone)]
pub struct FormatTemplate {
    segments: Vec<FormatSegment>,
    timestamp_format: String,
}

impl FormatTemplate {
    pub const DEFAULT_TIMESTAMP: &'static str = "%Y-%m-%d %H:%M:%S";

    /// Turns `"{timestamp} [{level}] {msg}"` into a segment list.
    #[must_use]
    pub fn parse(template: &str) -> Self {
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut i = 0;
        let chars: Vec<char> = template.chars().collect();

        while i < chars.len() {
            if chars[i] == '{' {
                if let Some(end) = chars[i..].iter().position(|&c| c == '}') {
                    let end = i + end;
                    let name: String = chars[i + 1..end].iter().collect();

                    if !current.is_empty() {
                        segments.push(FormatSegment::Literal(std::mem::take(&mut current)));
                    }

                    if let Some(ph) = Self::match_placeholder(&name) {
                        segments.push(FormatSegment::Placeholder(ph));
                    } else {
                        segments.push(FormatSegment::Literal(format!("{{{name}}}")));
                    }

                    i = end + 1;
                    continue;
                }
            }

            current.push(chars[i]);
            i += 1;
        }

        if !current.is_empty() {
            segments.push(FormatSegment::Literal(current));
        }

        Self {
            segments,
            timestamp_format: Self::DEFAULT_TIMESTAMP.to_string(),
        }
    }

    /// strftime pattern used for `{timestamp}`.
    #[must_use]
    pub fn timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    fn match_placeholder(name: &str) -> Option<Placeholder> {
        Placeholder::ALL
            .iter()
            .copied()
            .find(|ph| ph.as_str() == name)
    }

    #[must_use]
    pub fn segments(&self) -> &[FormatSegment] {
        &self.segments
    }

    /// Substitutes record fields into the pre-parsed segments.
    #[must_use]
    pub fn render(&self, record: &Record) -> String {
        let mut result = String::with_capacity(record.text.len() + 48);

        for segment in &self.segments {
            match segment {
                FormatSegment::Literal(s) => result.push_str(s),
                FormatSegment::Placeholder(ph) => match ph {
                    Placeholder::Timestamp => {
                        // A bad strftime pattern renders nothing rather than panicking
                        let ts = record.timestamp.format(&self.timestamp_format);
                        let _ = write!(result, "{ts}");
                    }
                    Placeholder::Level => result.push_str(record.level.as_str()),
                    Placeholder::File => {
                        result.push_str(record.location.map_or("", |l| l.file_name()));
                    }
                    Placeholder::Line => {
                        if let Some(loc) = record.location {
                            let _ = write!(result, "{}", loc.line);
                        }
                    }
                    Placeholder::Thread => result.push_str(&record.thread),
                    Placeholder::Msg => result.push_str(&record.text),
                },
            }
        }

        result
    }
}

impl Default for FormatTemplate {
    fn default() -> Self {
        Self::parse("{timestamp} [{level}] {msg}")
    }
}
