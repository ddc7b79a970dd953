//! ANSI escape handling. A formatter may embed color codes; persisted log
//! files never contain them.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// CSI sequences (`ESC [ ... final`), OSC sequences terminated by BEL or ST,
/// and the remaining two-byte `ESC x` forms.
static ANSI_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1b(?:\[[0-?]*[ -/]*[@-~]|\][^\x07\x1b]*(?:\x07|\x1b\\)|[@-Z\\-_])")
        .expect("Invalid ANSI regex")
});

/// Removes every ANSI escape sequence from `text`.
///
/// Lines without an ESC byte are returned borrowed, so the common uncolored
/// case costs one scan and no allocation.
#[must_use]
pub fn strip_ansi(text: &str) -> Cow<'_, str> {
    if !text.contains('\x1b') {
        return Cow::Borrowed(text);
    }
    let cleaned = ANSI_REGEX.replace_all(text, "");
    // A truncated sequence at the end of a line leaves a lone ESC behind
    if cleaned.contains('\x1b') {
        Cow::Owned(cleaned.replace('\x1b', ""))
    } else {
        cleaned
    }
}

/// True when `text` still carries an escape byte.
#[must_use]
pub fn has_ansi(text: &str) -> bool {
    text.contains('\x1b')
}
