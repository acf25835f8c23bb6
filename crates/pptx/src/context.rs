//! Per-part lookup tables passed explicitly down the import call chain.

use crate::media::MediaTable;
use crate::relationships::RelationshipMap;
use crate::theme::ThemeColors;
use deck_core::InlineMedia;

/// Tables needed to resolve references found in one part.
///
/// The theme and media tables are shared by the whole package; the
/// relationship map belongs to the part being resolved.
#[derive(Debug, Clone, Copy)]
pub struct PartContext<'a> {
    pub theme: &'a ThemeColors,
    pub relationships: &'a RelationshipMap,
    pub media: &'a MediaTable,
}

impl<'a> PartContext<'a> {
    pub fn new(
        theme: &'a ThemeColors,
        relationships: &'a RelationshipMap,
        media: &'a MediaTable,
    ) -> Self {
        Self {
            theme,
            relationships,
            media,
        }
    }

    /// Follow a relationship id to an encoded media entry.
    ///
    /// A missing relationship or media entry is simply `None`.
    pub fn media_for(&self, rel_id: &str) -> Option<InlineMedia> {
        let Some(relationship) = self.relationships.get(rel_id) else {
            log::debug!("relationship '{}' not found", rel_id);
            return None;
        };
        let media = self.media.get(relationship.target_file_name());
        if media.is_none() {
            log::debug!(
                "relationship '{}' points at missing media '{}'",
                rel_id,
                relationship.target
            );
        }
        media.cloned()
    }
}
