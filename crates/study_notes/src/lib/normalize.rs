use std::sync::LazyLock;

use regex::Regex;

static BOLD_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
static NON_ASCII_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\x00-\x7F]+").unwrap());
static BLANK_LINES_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{2,}").unwrap());

/// Normalizes raw model output into plain text.
///
/// Passes run in order: `**bold**` markers are unwrapped, every non-ASCII
/// character is dropped, runs of newlines collapse to one, and the result
/// is trimmed.
pub fn clean_text(text: &str) -> String {
    let text = BOLD_RE.replace_all(text, "$1");
    let text = NON_ASCII_RE.replace_all(&text, "");
    let text = BLANK_LINES_RE.replace_all(&text, "\n");
    text.trim().to_string()
}
