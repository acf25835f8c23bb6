//! PPTX (Office Open XML) package import.
//!
//! Turns a `.pptx` archive into the editor's normalized slide list:
//! theme colours, the slide/layout/master background cascade, inline media,
//! and per-shape text blocks.

pub mod background;
pub mod context;
pub mod media;
pub mod package;
pub mod relationships;
pub mod slide;
pub mod theme;
pub mod xml;

pub use background::{BackgroundDescriptor, ColorRef, LevelBackground};
pub use context::PartContext;
pub use media::MediaTable;
pub use package::PptxImporter;
pub use relationships::{Relationship, RelationshipMap};
pub use theme::{ThemeColors, ThemeSlot};
