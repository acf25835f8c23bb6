//! Relationship part (`*.rels`) parsing.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;

/// Where a relationship points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    pub target: String,
    /// Relationship type URI; empty when the producer omitted it.
    pub rel_type: String,
}

impl Relationship {
    /// Final path segment of the target (`image3.png` for `../media/image3.png`).
    pub fn target_file_name(&self) -> &str {
        self.target.rsplit('/').next().unwrap_or(&self.target)
    }
}

/// Part-local relationship ids mapped to their targets.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RelationshipMap {
    by_id: HashMap<String, Relationship>,
}

impl RelationshipMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the text of a relationship part.
    ///
    /// Attribute order does not matter. When an id repeats, the first entry
    /// is kept. Malformed input yields an empty map.
    pub fn parse(content: &str) -> Self {
        let mut map = Self::new();
        if content.trim().is_empty() {
            return map;
        }

        let mut reader = Reader::from_str(content);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Empty(ref e)) | Ok(Event::Start(ref e))
                    if e.local_name().as_ref() == b"Relationship" =>
                {
                    let mut id = String::new();
                    let mut target = String::new();
                    let mut rel_type = String::new();

                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map(|v| v.into_owned())
                            .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
                        match attr.key.local_name().as_ref() {
                            b"Id" => id = value,
                            b"Target" => target = value,
                            b"Type" => rel_type = value,
                            _ => {}
                        }
                    }

                    if !id.is_empty() && !target.is_empty() {
                        map.insert_first(id, Relationship { target, rel_type });
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    log::warn!("Discarding malformed relationship part: {}", e);
                    return Self::new();
                }
                _ => {}
            }
        }

        map
    }

    /// Insert unless the id is already present.
    pub fn insert_first(&mut self, id: impl Into<String>, relationship: Relationship) {
        self.by_id.entry(id.into()).or_insert(relationship);
    }

    pub fn get(&self, id: &str) -> Option<&Relationship> {
        self.by_id.get(id)
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Relationships whose target lives in the package media folder.
    pub fn media(&self) -> impl Iterator<Item = (&str, &Relationship)> {
        self.by_id
            .iter()
            .filter(|(_, rel)| rel.target.contains("media/"))
            .map(|(id, rel)| (id.as_str(), rel))
    }

    /// A copy holding only the media relationships.
    pub fn media_only(&self) -> Self {
        let mut map = Self::new();
        for (id, rel) in self.media() {
            map.insert_first(id, rel.clone());
        }
        map
    }

    /// Number of the slide layout this part references, if any.
    pub fn layout_number(&self) -> Option<usize> {
        let mut layouts: Vec<usize> = self
            .by_id
            .values()
            .filter(|rel| rel.target.contains("slideLayouts/"))
            .filter_map(|rel| crate::package::part_number(rel.target_file_name(), "slideLayout"))
            .collect();
        layouts.sort_unstable();
        layouts.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Target="../media/image1.png" Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/image"/>
</Relationships>"#;

    #[test]
    fn test_parse_either_attribute_order() {
        let map = RelationshipMap::parse(RELS);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("rId2").unwrap().target, "../media/image1.png");
        assert_eq!(map.get("rId2").unwrap().target_file_name(), "image1.png");
        assert!(map.get("rId1").unwrap().rel_type.ends_with("/slideLayout"));
    }

    #[test]
    fn test_first_entry_wins() {
        let xml = r#"<Relationships>
            <Relationship Id="rId1" Target="../media/first.png"/>
            <Relationship Id="rId1" Target="../media/second.png"/>
        </Relationships>"#;
        let map = RelationshipMap::parse(xml);
        assert_eq!(map.get("rId1").unwrap().target, "../media/first.png");
    }

    #[test]
    fn test_entity_escaped_target_is_decoded() {
        let xml = r#"<Relationships><Relationship Id="rId4" Target="../media/R&amp;D.png"/></Relationships>"#;
        let map = RelationshipMap::parse(xml);
        assert_eq!(map.get("rId4").unwrap().target_file_name(), "R&D.png");
    }

    #[test]
    fn test_missing_type_is_empty() {
        let map = RelationshipMap::parse(r#"<Relationships><Relationship Id="rId9" Target="x.xml"/></Relationships>"#);
        assert_eq!(map.get("rId9").unwrap().rel_type, "");
    }

    #[test]
    fn test_malformed_or_empty_input() {
        assert!(RelationshipMap::parse("").is_empty());
        assert!(RelationshipMap::parse("<Relationships><Relationship Id=").is_empty());
        assert!(RelationshipMap::parse("not xml at all").is_empty());
    }

    #[test]
    fn test_layout_number_and_media() {
        let map = RelationshipMap::parse(RELS);
        assert_eq!(map.layout_number(), Some(2));
        let media: Vec<_> = map.media().map(|(id, _)| id).collect();
        assert_eq!(media, vec!["rId2"]);
        let only = map.media_only();
        assert_eq!(only.len(), 1);
        assert!(only.get("rId1").is_none());
    }
}
