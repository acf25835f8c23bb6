//! Best-effort text recovery for legacy PPT (OLE/CFB) presentations.
//!
//! Legacy files are not parsed structurally. Readable text spans are scraped
//! from the bytes, filtered for obvious noise, and grouped into slides.

pub mod scraper;

pub use scraper::LegacyScraper;
