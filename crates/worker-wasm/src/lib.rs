//! WASM-compatible wrapper for presentation import.
//!
//! Exposes the import engine to the in-browser editor. Importing never
//! throws for bad input; unreadable files come back as placeholder slides.

use deck_core::{FileInfo, ImportOptions, ImportReport, PresentationFormat, Slide};
use deck_ppt::LegacyScraper;
use deck_pptx::PptxImporter;
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Result of importing a presentation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportResult {
    /// Detected format of the source file.
    pub format: String,
    /// Number of slides produced.
    pub slide_count: usize,
    /// Normalized slides, ready for the slide store.
    pub slides: Vec<Slide>,
    /// Set when content was lost or only recovered heuristically.
    pub degraded: bool,
    /// Non-blocking notice to surface when the import was degraded.
    pub notice: Option<String>,
}

impl ImportResult {
    fn from_report(report: ImportReport) -> Self {
        let notice = report.degraded.then(|| match report.format {
            PresentationFormat::Ppt => {
                "Legacy .ppt import recovers text only. Convert to .pptx for full fidelity."
                    .to_string()
            }
            PresentationFormat::Pptx => {
                "Some slides could not be fully parsed and were replaced with placeholders."
                    .to_string()
            }
        });

        Self {
            format: report.format.as_str().to_string(),
            slide_count: report.slides.len(),
            slides: report.slides,
            degraded: report.degraded,
            notice,
        }
    }
}

/// Import a presentation file.
///
/// # Arguments
/// * `data` - The raw bytes of the PPTX or PPT file
/// * `filename` - The uploaded filename (used for format detection and placeholder titles)
/// * `size` - The file size reported by the browser, in bytes
/// * `embed_media` - Whether to inline images as data URLs (default: true)
///
/// # Returns
/// A JavaScript object with the import result.
#[wasm_bindgen]
pub fn import_presentation(
    data: &[u8],
    filename: &str,
    size: f64,
    embed_media: Option<bool>,
) -> Result<JsValue, JsValue> {
    let options = ImportOptions::new().with_embed_media(embed_media.unwrap_or(true));
    let result = import_presentation_impl(data, filename, size, &options);

    serde_wasm_bindgen::to_value(&result)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

/// Format a byte count for display, e.g. "1.5 MB".
#[wasm_bindgen]
pub fn format_file_size(bytes: f64) -> String {
    deck_core::text::format_file_size(js_size(bytes))
}

fn import_presentation_impl(
    data: &[u8],
    filename: &str,
    size: f64,
    options: &ImportOptions,
) -> ImportResult {
    let file = FileInfo::new(filename, js_size(size));

    let report = match PresentationFormat::detect(data, &file) {
        PresentationFormat::Pptx => {
            PptxImporter::with_options(options.clone()).import_report(data, &file)
        }
        PresentationFormat::Ppt => LegacyScraper::new().import_report(data, &file),
    };

    ImportResult::from_report(report)
}

/// Convert a JS number to a byte count, clamping negatives and NaN to zero.
fn js_size(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unopenable_pptx_is_placeholder() {
        let result =
            import_presentation_impl(b"not a zip", "deck.pptx", 9.0, &ImportOptions::default());

        assert_eq!(result.format, "pptx");
        assert_eq!(result.slide_count, 1);
        assert_eq!(result.slides[0].title, "deck.pptx");
        assert_eq!(result.slides[0].subtitle, "Import Error");
    }

    #[test]
    fn test_legacy_import_carries_notice() {
        let result = import_presentation_impl(
            b"Welcome\x01Overview\x01",
            "talk.ppt",
            18.0,
            &ImportOptions::default(),
        );

        assert_eq!(result.format, "ppt");
        assert!(result.degraded);
        assert!(result.notice.is_some());
        assert_eq!(result.slides[0].title, "Welcome");
        assert_eq!(result.slides[1].title, "Overview");
    }

    #[test]
    fn test_js_size_clamps() {
        assert_eq!(js_size(1536.0), 1536);
        assert_eq!(js_size(-4.0), 0);
        assert_eq!(js_size(f64::NAN), 0);
    }

    #[test]
    fn test_result_serializes_camel_case() {
        let result = import_presentation_impl(b"", "x.pptx", 0.0, &ImportOptions::default());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("slideCount").is_some());
        assert_eq!(json["slides"][0]["background"], "#ffffff");
    }
}
