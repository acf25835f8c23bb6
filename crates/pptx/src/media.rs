//! Media folder extraction into inline `data:` references.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use deck_core::{ImportOptions, InlineMedia};
use std::collections::HashMap;
use std::io::{Read, Seek};
use zip::ZipArchive;

/// Folder holding the package's binary resources.
pub const MEDIA_PREFIX: &str = "ppt/media/";

/// Upper bound on the buffer reserved from an entry's declared size.
const MAX_INITIAL_CAPACITY: u64 = 1 << 20;

/// Media file name mapped to its encoded entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaTable {
    entries: HashMap<String, InlineMedia>,
}

impl MediaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode every entry under the media folder.
    ///
    /// An entry that cannot be read is skipped, which later reads as "no
    /// image" for anything referencing it.
    pub fn from_archive<R: Read + Seek>(
        archive: &mut ZipArchive<R>,
        options: &ImportOptions,
    ) -> Self {
        let mut table = Self::new();
        if !options.embed_media() {
            return table;
        }

        for index in 0..archive.len() {
            let mut file = match archive.by_index(index) {
                Ok(file) => file,
                Err(e) => {
                    log::warn!("Skipping unreadable archive entry #{}: {}", index, e);
                    continue;
                }
            };
            if file.is_dir() || !file.name().starts_with(MEDIA_PREFIX) {
                continue;
            }

            let path = file.name().to_string();
            let name = path.rsplit('/').next().unwrap_or(&path).to_string();
            if name.is_empty() {
                continue;
            }
            if !options.accepts_media_size(file.size()) {
                log::debug!("Skipping media '{}' ({} bytes) over size limit", path, file.size());
                continue;
            }

            let mut data = Vec::with_capacity(initial_capacity(file.size()));
            if let Err(e) = file.read_to_end(&mut data) {
                log::warn!("Could not extract media file '{}': {}", path, e);
                continue;
            }
            table.insert(name, &data);
        }

        log::debug!("Extracted {} media entries", table.len());
        table
    }

    /// Encode `data` and store it under `name`.
    pub fn insert(&mut self, name: impl Into<String>, data: &[u8]) {
        let name = name.into();
        let content_type = content_type_for(&name);
        let data_url = format!("data:{};base64,{}", content_type, STANDARD.encode(data));
        self.entries.insert(
            name.clone(),
            InlineMedia {
                name,
                content_type: content_type.to_string(),
                data_url,
            },
        );
    }

    pub fn get(&self, name: &str) -> Option<&InlineMedia> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Buffer to reserve for an entry whose header declares `declared` bytes.
///
/// The declared size is untrusted; `read_to_end` grows past the cap.
fn initial_capacity(declared: u64) -> usize {
    usize::try_from(declared.min(MAX_INITIAL_CAPACITY)).unwrap_or(0)
}

/// Content type inferred from a media file extension.
pub fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        "tiff" | "tif" => "image/tiff",
        "emf" => "image/x-emf",
        "wmf" => "image/x-wmf",
        _ => "image/png",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};
    use zip::write::FileOptions;
    use zip::ZipWriter;

    #[test]
    fn test_declared_size_does_not_drive_reservation() {
        assert_eq!(initial_capacity(0), 0);
        assert_eq!(initial_capacity(4096), 4096);
        assert_eq!(initial_capacity(u64::from(u32::MAX)), 1 << 20);
        assert_eq!(initial_capacity(u64::MAX), 1 << 20);
    }

    #[test]
    fn test_content_types() {
        assert_eq!(content_type_for("photo.JPG"), "image/jpeg");
        assert_eq!(content_type_for("vector.svg"), "image/svg+xml");
        assert_eq!(content_type_for("mystery.bin"), "image/png");
        assert_eq!(content_type_for("noext"), "image/png");
    }

    #[test]
    fn test_insert_builds_data_url() {
        let mut table = MediaTable::new();
        table.insert("image1.gif", b"GIF89a");
        let media = table.get("image1.gif").unwrap();
        assert_eq!(media.content_type, "image/gif");
        assert_eq!(media.data_url, "data:image/gif;base64,R0lGODlh");
    }

    fn archive_with_media() -> ZipArchive<Cursor<Vec<u8>>> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        zip.start_file("ppt/media/image1.png", FileOptions::default()).unwrap();
        zip.write_all(&[1u8; 16]).unwrap();
        zip.start_file("ppt/media/image2.jpeg", FileOptions::default()).unwrap();
        zip.write_all(&[2u8; 4096]).unwrap();
        zip.start_file("ppt/slides/slide1.xml", FileOptions::default()).unwrap();
        zip.write_all(b"<p:sld/>").unwrap();
        let cursor = zip.finish().unwrap();
        ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn test_from_archive_only_reads_media_folder() {
        let mut archive = archive_with_media();
        let table = MediaTable::from_archive(&mut archive, &ImportOptions::default());
        assert_eq!(table.len(), 2);
        assert!(table.get("image1.png").is_some());
        assert!(table.get("slide1.xml").is_none());
    }

    #[test]
    fn test_from_archive_respects_options() {
        let mut archive = archive_with_media();
        let limited = ImportOptions::new().with_max_media_bytes(Some(1024));
        let table = MediaTable::from_archive(&mut archive, &limited);
        assert_eq!(table.len(), 1);
        assert!(table.get("image2.jpeg").is_none());

        let disabled = ImportOptions::new().with_embed_media(false);
        assert!(MediaTable::from_archive(&mut archive, &disabled).is_empty());
    }
}
