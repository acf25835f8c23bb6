//! Text cleanup applied to recovered slide text.

use regex::Regex;
use std::sync::LazyLock;
use unicode_normalization::UnicodeNormalization;

/// Regex to collapse runs of horizontal whitespace into one space.
static WHITESPACE_COLLAPSE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());

/// NFC-normalize, collapse horizontal whitespace, and trim.
///
/// Line breaks are kept so multi-line legacy spans survive.
pub fn clean_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    WHITESPACE_COLLAPSE_REGEX
        .replace_all(&composed, " ")
        .trim()
        .to_string()
}

/// Join pieces with a single space, dropping the empty ones.
pub fn join_words<I, S>(pieces: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    pieces
        .into_iter()
        .map(|p| clean_text(p.as_ref()))
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Format a byte count the way the editor shows file sizes.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}
