//! Placeholder slides emitted in place of content that could not be read.
//!
//! Every failure mode of an import ends up here, so callers always receive
//! a usable, non-empty slide list.

use crate::text::format_file_size;
use crate::types::{Background, FileInfo, Slide, SlideLayout};

/// Background used for legacy-format notices.
pub const LEGACY_NOTICE_BACKGROUND: &str = "#4a5568";

/// The package opened but contained no slide parts.
pub fn empty_package(file: &FileInfo) -> Slide {
    Slide {
        title: "Imported Presentation".to_string(),
        subtitle: file.name.clone(),
        content: "Slide content could not be fully parsed.".to_string(),
        layout: SlideLayout::Title,
        ..Slide::new(1)
    }
}

/// The input could not be opened as a package at all.
pub fn import_error(file: &FileInfo) -> Slide {
    Slide {
        title: file.name.clone(),
        subtitle: "Import Error".to_string(),
        content: format!(
            "The presentation could not be fully parsed. Try exporting to create a new compatible file.\n\nFile size: {}",
            format_file_size(file.size)
        ),
        layout: SlideLayout::Title,
        ..Slide::new(1)
    }
}

/// One slide failed to parse; its siblings are unaffected.
pub fn unreadable_slide(index: usize, background: Option<Background>) -> Slide {
    Slide {
        title: format!("Slide {}", index),
        content: "Could not parse slide content".to_string(),
        layout: SlideLayout::Content,
        background: background.unwrap_or_default(),
        ..Slide::new(index)
    }
}

/// No usable text could be recovered from a legacy file.
pub fn legacy_unavailable(file: &FileInfo) -> Slide {
    let title = file
        .name
        .strip_suffix(".ppt")
        .or_else(|| file.name.strip_suffix(".PPT"))
        .unwrap_or(&file.name)
        .to_string();

    Slide {
        title,
        subtitle: "Legacy PPT Format".to_string(),
        content: "This is a legacy .ppt file. Text content has been extracted where possible.\n\n\
                  For full visual fidelity, please convert to .pptx format using Microsoft PowerPoint or LibreOffice."
            .to_string(),
        layout: SlideLayout::Title,
        background: Background::solid(LEGACY_NOTICE_BACKGROUND),
        ..Slide::new(1)
    }
}
