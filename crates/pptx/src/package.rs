//! PPTX package import: part discovery, shared tables, and per-slide
//! assembly.

use crate::background::{BackgroundDescriptor, LevelBackground};
use crate::context::PartContext;
use crate::media::MediaTable;
use crate::relationships::RelationshipMap;
use crate::slide;
use crate::theme::ThemeColors;
use crate::xml::{self, XmlElement};
use deck_core::{
    placeholder, Error, FallbackChain, FileInfo, ImportOptions, ImportReport, PresentationFormat,
    Result, Slide,
};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek};
use zip::result::ZipError;
use zip::ZipArchive;

const SLIDES_DIR: &str = "ppt/slides/";
const LAYOUTS_DIR: &str = "ppt/slideLayouts/";
const THEME_PATH: &str = "ppt/theme/theme1.xml";
const MASTER_PATH: &str = "ppt/slideMasters/slideMaster1.xml";
const MASTER_RELS_PATH: &str = "ppt/slideMasters/_rels/slideMaster1.xml.rels";

/// Importer for PPTX (Office Open XML) packages.
#[derive(Debug, Clone, Default)]
pub struct PptxImporter {
    options: ImportOptions,
}

impl PptxImporter {
    /// Create an importer with default options.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    /// Import a package into its ordered slide list.
    ///
    /// Never fails: damaged input produces placeholder slides, and the list
    /// always has at least one entry.
    pub fn import(&self, data: &[u8], file: &FileInfo) -> Vec<Slide> {
        self.import_report(data, file).slides
    }

    /// Like [`import`](Self::import), also reporting whether any part of the
    /// import degraded to a placeholder.
    pub fn import_report(&self, data: &[u8], file: &FileInfo) -> ImportReport {
        let (slides, degraded) = match Package::open(Cursor::new(data)) {
            Ok(mut package) => self.import_package(&mut package, file),
            Err(e) => {
                log::warn!("Could not open '{}' as a presentation package: {}", file.name, e);
                (vec![placeholder::import_error(file)], true)
            }
        };

        ImportReport {
            format: PresentationFormat::Pptx,
            slides,
            degraded,
        }
    }

    fn import_package<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        file: &FileInfo,
    ) -> (Vec<Slide>, bool) {
        let slide_parts = package.numbered_parts(SLIDES_DIR, "slide");
        if slide_parts.is_empty() {
            log::warn!("No slide parts found in '{}'", file.name);
            return (vec![placeholder::empty_package(file)], true);
        }
        log::debug!("Found {} slide parts in '{}'", slide_parts.len(), file.name);

        let master = package.read_tree(MASTER_PATH);
        let theme_part = package.read_tree(THEME_PATH);
        let theme = ThemeColors::from_theme(theme_part.as_ref())
            .with_color_map(master.as_ref().and_then(|m| m.find("clrMap")));

        let media = MediaTable::from_archive(package.archive_mut(), &self.options);
        let master_rels = package.relationships_for(MASTER_RELS_PATH).media_only();
        log::debug!("Master declares {} media relationships", master_rels.len());

        let master_background = self.master_background(package, master.as_ref(), &theme, &master_rels, &media);
        let layout_backgrounds = self.layout_backgrounds(package, &theme, &media);

        let mut slides = Vec::with_capacity(slide_parts.len());
        let mut degraded = false;

        for (position, (number, path)) in slide_parts.iter().enumerate() {
            let index = position + 1;
            let slide_rels = package.relationships_for(&rels_path(SLIDES_DIR, "slide", *number));
            let layout = slide_rels.layout_number();

            let inherited = FallbackChain::new()
                .then_value("layout", layout.and_then(|n| layout_backgrounds.get(&n).cloned()))
                .then_value("master", master_background.clone())
                .resolve();

            let ctx = PartContext::new(&theme, &slide_rels, &media);
            let assembled = package
                .read_text(path)
                .and_then(|content| slide::try_assemble_slide(&content, index, &ctx, inherited.as_ref()));

            match assembled {
                Ok(slide) => slides.push(slide),
                Err(e) => {
                    log::warn!("Failed to parse slide {} ('{}'): {}", index, path, e);
                    degraded = true;
                    slides.push(slide::unreadable(index, inherited.as_ref()));
                }
            }
        }

        (slides, degraded)
    }

    /// The master background, falling back to the first layout when the
    /// master declares none.
    fn master_background<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        master: Option<&XmlElement>,
        theme: &ThemeColors,
        master_rels: &RelationshipMap,
        media: &MediaTable,
    ) -> Option<LevelBackground> {
        let from_master = master.and_then(|root| {
            let ctx = PartContext::new(theme, master_rels, media);
            BackgroundDescriptor::from_part(root).resolve(&ctx).definite()
        });

        FallbackChain::new()
            .then_value("master", from_master)
            .then("layout1", || {
                let root = package.read_tree(&format!("{}slideLayout1.xml", LAYOUTS_DIR))?;
                let rels = package.relationships_for(&rels_path(LAYOUTS_DIR, "slideLayout", 1));
                let ctx = PartContext::new(theme, &rels, media);
                BackgroundDescriptor::from_part(&root).resolve(&ctx).definite()
            })
            .resolve()
    }

    /// Definite backgrounds of every layout, keyed by layout number.
    fn layout_backgrounds<R: Read + Seek>(
        &self,
        package: &mut Package<R>,
        theme: &ThemeColors,
        media: &MediaTable,
    ) -> BTreeMap<usize, LevelBackground> {
        let mut backgrounds = BTreeMap::new();

        for (number, path) in package.numbered_parts(LAYOUTS_DIR, "slideLayout") {
            let Some(root) = package.read_tree(&path) else {
                continue;
            };
            let rels = package.relationships_for(&rels_path(LAYOUTS_DIR, "slideLayout", number));
            let ctx = PartContext::new(theme, &rels, media);
            if let Some(background) = BackgroundDescriptor::from_part(&root).resolve(&ctx).definite() {
                backgrounds.insert(number, background);
            }
        }

        log::debug!("{} layouts declare a background", backgrounds.len());
        backgrounds
    }
}

/// Thin wrapper over the ZIP archive for reading package parts.
struct Package<R> {
    archive: ZipArchive<R>,
}

impl<R: Read + Seek> Package<R> {
    fn open(reader: R) -> Result<Self> {
        let archive = ZipArchive::new(reader)
            .map_err(|e| Error::ZipError(format!("Failed to open ZIP: {}", e)))?;
        Ok(Self { archive })
    }

    fn archive_mut(&mut self) -> &mut ZipArchive<R> {
        &mut self.archive
    }

    /// Parts named `{dir}{stem}{N}.xml`, sorted by `N`.
    ///
    /// Archive listing order is not meaningful, so the numeric suffix is the
    /// only ordering used.
    fn numbered_parts(&self, dir: &str, stem: &str) -> Vec<(usize, String)> {
        let mut parts: Vec<(usize, String)> = self
            .archive
            .file_names()
            .filter_map(|name| {
                let file_name = name.strip_prefix(dir)?;
                if file_name.contains('/') {
                    return None;
                }
                part_number(file_name, stem).map(|n| (n, name.to_string()))
            })
            .collect();
        parts.sort();
        parts
    }

    /// Read a part as text.
    fn read_text(&mut self, path: &str) -> Result<String> {
        let mut file = self.archive.by_name(path).map_err(|e| match e {
            ZipError::FileNotFound => Error::MissingPart(path.to_string()),
            other => Error::ZipError(format!("Failed to open '{}': {}", path, other)),
        })?;

        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        decode_part_text(&bytes).ok_or_else(|| Error::MalformedPart {
            part: path.to_string(),
            reason: "not valid UTF-8 or UTF-16 text".to_string(),
        })
    }

    /// Read a part that may legitimately be absent.
    fn read_optional(&mut self, path: &str) -> Option<String> {
        match self.read_text(path) {
            Ok(content) => Some(content),
            Err(Error::MissingPart(_)) => None,
            Err(e) => {
                log::warn!("Ignoring unreadable part: {}", e);
                None
            }
        }
    }

    /// Read and parse an optional XML part; failures contribute nothing.
    fn read_tree(&mut self, path: &str) -> Option<XmlElement> {
        let content = self.read_optional(path)?;
        match xml::parse(&content) {
            Ok(root) => Some(root),
            Err(e) => {
                log::warn!("Ignoring malformed part '{}': {}", path, e);
                None
            }
        }
    }

    fn relationships_for(&mut self, rels_path: &str) -> RelationshipMap {
        self.read_optional(rels_path)
            .map(|content| RelationshipMap::parse(&content))
            .unwrap_or_default()
    }
}

/// `ppt/slides/_rels/slide3.xml.rels` for `("ppt/slides/", "slide", 3)`.
fn rels_path(dir: &str, stem: &str, number: usize) -> String {
    format!("{}_rels/{}{}.xml.rels", dir, stem, number)
}

/// Extract `N` from a file name like `slide12.xml` given the stem `slide`.
pub(crate) fn part_number(file_name: &str, stem: &str) -> Option<usize> {
    let digits = file_name.strip_prefix(stem)?.strip_suffix(".xml")?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Decode part bytes, honouring a UTF-8 or UTF-16 byte order mark.
fn decode_part_text(bytes: &[u8]) -> Option<String> {
    match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8(rest.to_vec()).ok(),
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        _ => String::from_utf8(bytes.to_vec()).ok(),
    }
}

fn decode_utf16(bytes: &[u8], to_unit: fn([u8; 2]) -> u16) -> Option<String> {
    let units = bytes.chunks_exact(2).map(|pair| to_unit([pair[0], pair[1]]));
    let text: String = char::decode_utf16(units).collect::<std::result::Result<_, _>>().ok()?;
    // The declaration still names UTF-16; quick-xml reads the text as-is.
    Some(text.replacen("encoding=\"UTF-16\"", "encoding=\"UTF-8\"", 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_part_number() {
        assert_eq!(part_number("slide1.xml", "slide"), Some(1));
        assert_eq!(part_number("slide123.xml", "slide"), Some(123));
        assert_eq!(part_number("slideLayout7.xml", "slideLayout"), Some(7));
        assert_eq!(part_number("slideLayout7.xml", "slide"), None);
        assert_eq!(part_number("slide.xml", "slide"), None);
        assert_eq!(part_number("slide2.xml.rels", "slide"), None);
    }

    #[test]
    fn test_rels_path() {
        assert_eq!(rels_path(SLIDES_DIR, "slide", 3), "ppt/slides/_rels/slide3.xml.rels");
        assert_eq!(
            rels_path(LAYOUTS_DIR, "slideLayout", 1),
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels"
        );
    }

    #[test]
    fn test_decode_part_text() {
        assert_eq!(decode_part_text(b"\xEF\xBB\xBF<a/>"), Some("<a/>".to_string()));
        assert_eq!(decode_part_text(&[0xFF, 0xFE, b'<', 0, b'a', 0, b'/', 0, b'>', 0]), Some("<a/>".to_string()));
        assert_eq!(decode_part_text(&[0xC3, 0x28]), None);
    }
}
