//! Domain types for representing imported presentation content.

use serde::{Deserialize, Serialize};

/// The solid colour used when nothing in the cascade defines a background.
pub const DEFAULT_BACKGROUND: &str = "#ffffff";

/// Display name and size of the uploaded file.
///
/// Only used to word placeholder slides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileInfo {
    pub name: String,
    pub size: u64,
}

impl FileInfo {
    pub fn new(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }

    /// The file extension, lowercased, if there is one.
    pub fn extension(&self) -> Option<String> {
        self.name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .filter(|ext| !ext.is_empty())
    }
}

/// The format of the source presentation file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationFormat {
    /// Modern PPTX (Office Open XML).
    Pptx,
    /// Legacy PPT (OLE/CFB binary).
    Ppt,
}

impl PresentationFormat {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pptx" => Some(Self::Pptx),
            "ppt" => Some(Self::Ppt),
            _ => None,
        }
    }

    /// Detect format from file magic bytes.
    pub fn from_magic(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < 4 {
            return None;
        }

        // PPTX is a ZIP file (PK\x03\x04)
        if bytes.starts_with(&[0x50, 0x4B, 0x03, 0x04]) {
            return Some(Self::Pptx);
        }

        // PPT is an OLE/CFB file (D0 CF 11 E0 A1 B1 1A E1)
        if bytes.len() >= 8
            && bytes.starts_with(&[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1])
        {
            return Some(Self::Ppt);
        }

        None
    }

    /// Pick the import path for an upload.
    ///
    /// Magic bytes win over the extension. Anything unrecognised goes down
    /// the package path, which reports an unopenable container itself.
    pub fn detect(bytes: &[u8], file: &FileInfo) -> Self {
        Self::from_magic(bytes)
            .or_else(|| file.extension().as_deref().and_then(Self::from_extension))
            .unwrap_or(Self::Pptx)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pptx => "pptx",
            Self::Ppt => "ppt",
        }
    }
}

/// Which of the two editor layouts a slide uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlideLayout {
    Title,
    Content,
}

impl SlideLayout {
    /// Two or fewer text blocks read as a title slide.
    pub fn from_block_count(count: usize) -> Self {
        if count <= 2 {
            Self::Title
        } else {
            Self::Content
        }
    }
}

/// A fully resolved slide fill. Never holds a scheme reference.
///
/// Serialises as the CSS value the editor applies directly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Background {
    /// `#rrggbb` colour.
    Solid(String),
    /// Two or more `#rrggbb` stops, top to bottom.
    Gradient(Vec<String>),
}

impl Background {
    pub fn solid(color: impl Into<String>) -> Self {
        Self::Solid(color.into())
    }

    /// The plain white fill.
    pub fn white() -> Self {
        Self::Solid(DEFAULT_BACKGROUND.to_string())
    }

    /// The CSS value for this fill.
    pub fn to_css(&self) -> String {
        match self {
            Self::Solid(color) => color.clone(),
            Self::Gradient(stops) => format!("linear-gradient(180deg, {})", stops.join(", ")),
        }
    }

    /// The colour if this is a solid fill.
    pub fn as_solid(&self) -> Option<&str> {
        match self {
            Self::Solid(color) => Some(color),
            Self::Gradient(_) => None,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::white()
    }
}

impl From<Background> for String {
    fn from(background: Background) -> Self {
        background.to_css()
    }
}

impl TryFrom<String> for Background {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        let trimmed = value.trim();
        if let Some(inner) = trimmed
            .strip_prefix("linear-gradient(")
            .and_then(|rest| rest.strip_suffix(')'))
        {
            let stops: Vec<String> = inner
                .split(',')
                .map(|part| part.trim())
                .filter(|part| part.starts_with('#'))
                .map(str::to_string)
                .collect();
            if stops.len() >= 2 {
                return Ok(Self::Gradient(stops));
            }
            return Err(format!("gradient needs at least two colour stops: {}", value));
        }
        if trimmed.starts_with('#') {
            return Ok(Self::Solid(trimmed.to_string()));
        }
        Err(format!("unrecognised background value: {}", value))
    }
}

/// A media entry encoded as an inline `data:` reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineMedia {
    /// File name inside the package media folder; the media identity.
    pub name: String,
    pub content_type: String,
    pub data_url: String,
}

/// What the editor should paint behind a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlideDisplay<'a> {
    Image(&'a InlineMedia),
    Fill(&'a Background),
}

/// One normalized slide, ready for the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Slide {
    /// 1-based position.
    pub id: usize,
    pub title: String,
    pub subtitle: String,
    /// Remaining text blocks, newline-joined.
    pub content: String,
    pub layout: SlideLayout,
    pub background: Background,
    pub background_image: Option<InlineMedia>,
    pub images: Vec<InlineMedia>,
    /// Speaker notes; not imported.
    pub notes: String,
}

impl Slide {
    /// Create an empty title slide with a white background.
    pub fn new(id: usize) -> Self {
        Self {
            id,
            title: String::new(),
            subtitle: String::new(),
            content: String::new(),
            layout: SlideLayout::Title,
            background: Background::white(),
            background_image: None,
            images: Vec::new(),
            notes: String::new(),
        }
    }

    /// Fill title, subtitle and content from ordered text blocks.
    ///
    /// The first block is the title, the second the subtitle, and the rest
    /// become newline-joined content. With no blocks the title falls back to
    /// `Slide {id}`.
    pub fn with_text_blocks(mut self, blocks: &[String]) -> Self {
        self.title = blocks
            .first()
            .cloned()
            .unwrap_or_else(|| format!("Slide {}", self.id));
        self.subtitle = blocks.get(1).cloned().unwrap_or_default();
        self.content = blocks.get(2..).map(|rest| rest.join("\n")).unwrap_or_default();
        self.layout = SlideLayout::from_block_count(blocks.len());
        self
    }

    pub fn with_background(mut self, background: Background) -> Self {
        self.background = background;
        self
    }

    /// When both an image and a fill resolved, the image is shown.
    pub fn display_background(&self) -> SlideDisplay<'_> {
        match &self.background_image {
            Some(image) => SlideDisplay::Image(image),
            None => SlideDisplay::Fill(&self.background),
        }
    }
}

/// The result of one import call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub format: PresentationFormat,
    /// Always at least one slide.
    pub slides: Vec<Slide>,
    /// True when any placeholder or heuristic path was taken.
    pub degraded: bool,
}
