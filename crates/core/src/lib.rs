//! Core slide types, errors, and shared resolution helpers for
//! presentation import.

pub mod error;
pub mod options;
pub mod placeholder;
pub mod resolve;
pub mod text;
pub mod types;

pub use error::{Error, Result};
pub use options::ImportOptions;
pub use resolve::FallbackChain;
pub use types::{
    Background, FileInfo, ImportReport, InlineMedia, PresentationFormat, Slide, SlideDisplay,
    SlideLayout,
};
