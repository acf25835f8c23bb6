//! Heuristic text scraping for legacy PPT files.
//!
//! ## Approach
//!
//! A run of printable ASCII bytes is a candidate span; a printable byte
//! followed by a null is read as one UTF-16LE code unit. Line breaks inside
//! an active span are kept, any other non-printable byte ends the span.
//! Spans that look like binary noise are dropped, duplicates are removed,
//! and blank-line separated groups become slides.

use cfb::CompoundFile;
use deck_core::{
    placeholder, Error, FallbackChain, FileInfo, ImportReport, PresentationFormat, Result, Slide,
};
use regex::Regex;
use std::collections::HashSet;
use std::io::{Cursor, Read};
use std::sync::LazyLock;

/// Stream holding slide records inside the compound file.
const DOCUMENT_STREAM: &str = "/PowerPoint Document";

/// Shortest span worth keeping, in characters.
const MIN_SPAN_CHARS: usize = 3;

static ALL_CAPS_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,}$").unwrap());
static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+$").unwrap());
static SEPARATORS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[_\-.]+$").unwrap());
static HAS_LETTER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[a-zA-Z]").unwrap());

/// Product names the producing application stamps into its own files.
const PRODUCT_MARKERS: &[&str] = &["Microsoft", "PowerPoint"];

/// Substrings that mark a span as a URL rather than slide text.
const URL_MARKERS: &[&str] = &["www.", "http"];

/// Regex to split recovered text at blank lines.
static BLANK_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Scraper for legacy PPT files.
pub struct LegacyScraper;

impl LegacyScraper {
    /// Create a new legacy scraper.
    pub fn new() -> Self {
        Self
    }

    /// Recover slides from legacy bytes.
    ///
    /// Never fails; when no text can be recovered the result is a single
    /// slide recommending conversion to `.pptx`.
    pub fn import(&self, data: &[u8], file: &FileInfo) -> Vec<Slide> {
        self.import_report(data, file).slides
    }

    /// Like [`import`](Self::import), wrapped in a report. Legacy imports
    /// are always marked degraded.
    pub fn import_report(&self, data: &[u8], file: &FileInfo) -> ImportReport {
        let text = self.recover_text(data);
        let mut slides = segment_into_slides(&text);

        if slides.is_empty() {
            log::warn!("No readable text recovered from legacy file '{}'", file.name);
            slides.push(placeholder::legacy_unavailable(file));
        } else {
            log::debug!("Recovered {} slides from '{}'", slides.len(), file.name);
        }

        ImportReport {
            format: PresentationFormat::Ppt,
            slides,
            degraded: true,
        }
    }

    /// Recover de-duplicated text spans joined by blank lines.
    ///
    /// The document stream is scanned when the bytes open as a compound
    /// file; otherwise, or when the stream yields nothing, the raw bytes are.
    pub fn recover_text(&self, data: &[u8]) -> String {
        FallbackChain::new()
            .then("document stream", || match read_document_stream(data) {
                Ok(stream) => non_empty(join_unique(scan_spans(&stream))),
                Err(e) => {
                    log::debug!("Scanning raw bytes: {}", e);
                    None
                }
            })
            .then("raw bytes", || non_empty(join_unique(scan_spans(data))))
            .resolve_or(String::new())
    }
}

impl Default for LegacyScraper {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

/// Read the PowerPoint Document stream from the CFB container.
fn read_document_stream(data: &[u8]) -> Result<Vec<u8>> {
    let mut cfb = CompoundFile::open(Cursor::new(data))
        .map_err(|e| Error::CfbError(format!("Failed to open CFB container: {}", e)))?;

    let mut stream = cfb.open_stream(DOCUMENT_STREAM).map_err(|e| {
        Error::CfbError(format!("Failed to open PowerPoint Document stream: {}", e))
    })?;

    let mut bytes = Vec::new();
    stream.read_to_end(&mut bytes)?;
    Ok(bytes)
}

fn is_printable(byte: u8) -> bool {
    (32..127).contains(&byte)
}

fn is_line_break(byte: u8) -> bool {
    byte == b'\r' || byte == b'\n'
}

/// Scan bytes for candidate text spans, in order, noise already dropped.
pub fn scan_spans(bytes: &[u8]) -> Vec<String> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut in_text = false;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        let followed_by_null = bytes.get(i + 1) == Some(&0);

        if is_printable(byte) {
            current.push(byte as char);
            in_text = true;
            if followed_by_null {
                i += 1;
            }
        } else if is_line_break(byte) && in_text {
            if current.chars().count() >= MIN_SPAN_CHARS {
                current.push('\n');
            }
            if followed_by_null {
                i += 1;
            }
        } else {
            if in_text {
                finish_span(&mut spans, &current);
            }
            current.clear();
            in_text = false;
        }

        i += 1;
    }

    if in_text {
        finish_span(&mut spans, &current);
    }

    spans
}

fn finish_span(spans: &mut Vec<String>, raw: &str) {
    let cleaned = raw.trim();
    if cleaned.chars().count() >= MIN_SPAN_CHARS && !is_noise(cleaned) {
        spans.push(cleaned.to_string());
    }
}

/// Whether a span looks like binary noise rather than slide text.
fn is_noise(span: &str) -> bool {
    ALL_CAPS_CODE.is_match(span)
        || DIGITS_ONLY.is_match(span)
        || SEPARATORS_ONLY.is_match(span)
        || !HAS_LETTER.is_match(span)
        || PRODUCT_MARKERS.iter().any(|m| span.contains(m))
        || URL_MARKERS.iter().any(|m| span.contains(m))
}

/// Drop exact duplicates, keeping first occurrences, and join with blank lines.
pub fn join_unique(spans: Vec<String>) -> String {
    let mut seen = HashSet::new();
    spans
        .into_iter()
        .filter(|span| seen.insert(span.clone()))
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Split recovered text at blank lines into slides.
///
/// Each group's first line is the title, the second the subtitle, and the
/// rest the content.
pub fn segment_into_slides(text: &str) -> Vec<Slide> {
    BLANK_LINE_REGEX
        .split(text)
        .map(|chunk| {
            chunk
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .filter(|lines| !lines.is_empty())
        .enumerate()
        .map(|(i, lines)| Slide::new(i + 1).with_text_blocks(&lines))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use deck_core::SlideLayout;
    use std::io::Write;

    #[test]
    fn test_scan_ascii_spans() {
        let spans = scan_spans(b"\x01Hello World\x02\x03Second span\xff");
        assert_eq!(spans, vec!["Hello World", "Second span"]);
    }

    #[test]
    fn test_scan_utf16_spans() {
        let data = [b'H', 0, b'e', 0, b'l', 0, b'l', 0, b'o', 0, 0xFF];
        assert_eq!(scan_spans(&data), vec!["Hello"]);
    }

    #[test]
    fn test_line_breaks_stay_inside_span() {
        let spans = scan_spans(b"Title line\r\nBody line\x01");
        assert_eq!(spans, vec!["Title line\n\nBody line"]);
    }

    #[test]
    fn test_short_spans_dropped() {
        assert!(scan_spans(b"ab\x01cd\x01").is_empty());
    }

    #[test]
    fn test_noise_filters() {
        assert!(is_noise("ABCD"));
        assert!(is_noise("12345"));
        assert!(is_noise("---"));
        assert!(is_noise("...!!"));
        assert!(is_noise("Microsoft Office"));
        assert!(is_noise("PowerPoint Document"));
        assert!(is_noise("see www.example.com"));
        assert!(is_noise("https://example.com"));
        assert!(!is_noise("Agenda"));
        assert!(!is_noise("Q3 goals"));
    }

    #[test]
    fn test_recover_text_filters_and_dedupes() {
        let scraper = LegacyScraper::new();
        let text = scraper.recover_text(b"Welcome\x01Microsoft\x01Overview\x01Overview\x01");
        assert!(text.contains("Welcome"));
        assert_eq!(text.matches("Overview").count(), 1);
        assert!(!text.contains("Microsoft"));
    }

    #[test]
    fn test_segment_into_slides() {
        let slides = segment_into_slides("Intro\n\nAgenda\nItem one\nItem two\nItem three");
        assert_eq!(slides.len(), 2);
        assert_eq!(slides[0].title, "Intro");
        assert_eq!(slides[0].layout, SlideLayout::Title);
        assert_eq!(slides[1].id, 2);
        assert_eq!(slides[1].title, "Agenda");
        assert_eq!(slides[1].subtitle, "Item one");
        assert_eq!(slides[1].content, "Item two\nItem three");
        assert_eq!(slides[1].layout, SlideLayout::Content);
    }

    #[test]
    fn test_no_text_yields_placeholder() {
        let scraper = LegacyScraper::new();
        let report = scraper.import_report(&[0u8; 64], &FileInfo::new("old.ppt", 64));
        assert_eq!(report.slides.len(), 1);
        assert_eq!(report.slides[0].title, "old");
        assert_eq!(report.slides[0].subtitle, "Legacy PPT Format");
        assert!(report.degraded);
    }

    #[test]
    fn test_compound_file_scans_document_stream() {
        let mut cfb = CompoundFile::create(Cursor::new(Vec::new())).unwrap();
        {
            let mut stream = cfb.create_stream(DOCUMENT_STREAM).unwrap();
            stream.write_all(b"\x00\x01Quarterly review\x02\x03").unwrap();
        }
        cfb.flush().unwrap();
        let data = cfb.into_inner().into_inner();

        let scraper = LegacyScraper::new();
        let text = scraper.recover_text(&data);
        assert_eq!(text, "Quarterly review");

        let slides = scraper.import(&data, &FileInfo::new("review.ppt", data.len() as u64));
        assert_eq!(slides.len(), 1);
        assert_eq!(slides[0].title, "Quarterly review");
    }
}
