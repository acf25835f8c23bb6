//! Slide assembly: background cascade, text blocks, and pictures for one
//! slide part.

use crate::background::{BackgroundDescriptor, LevelBackground};
use crate::context::PartContext;
use crate::xml::{self, XmlElement};
use deck_core::placeholder;
use deck_core::text::join_words;
use deck_core::{Background, FallbackChain, InlineMedia, Result, Slide};

/// Placeholder for a slide that could not be parsed.
pub fn unreadable(index: usize, inherited: Option<&LevelBackground>) -> Slide {
    let fill = inherited
        .and_then(|level| level.fill.as_ref())
        .and_then(Background::as_solid)
        .map(Background::solid);
    placeholder::unreadable_slide(index, fill)
}

/// Assemble one slide, reporting malformed XML as an error.
///
/// `inherited` is the layout background (or the master's when the layout
/// has none), already resolved against the part that declared it. Callers
/// substitute [`unreadable`] on error.
pub fn try_assemble_slide(
    content: &str,
    index: usize,
    ctx: &PartContext<'_>,
    inherited: Option<&LevelBackground>,
) -> Result<Slide> {
    let root = xml::parse(content)?;

    let own = BackgroundDescriptor::from_part(&root).resolve(ctx);
    let (level, effective) = FallbackChain::new()
        .then("slide", || own.definite())
        .then("inherited", || inherited.cloned().and_then(LevelBackground::definite))
        .resolve_labeled()
        .unwrap_or(("default", LevelBackground::default()));
    log::debug!("slide {} background from {}", index, level);

    let background_image = effective.image;
    let background = effective.fill.unwrap_or_default();

    let blocks = text_blocks(&root);
    let images = pictures(&root, ctx, background_image.as_ref());

    let mut slide = Slide::new(index)
        .with_text_blocks(&blocks)
        .with_background(background);
    slide.background_image = background_image;
    slide.images = images;
    Ok(slide)
}

/// One text block per shape: its runs joined by a space.
fn text_blocks(root: &XmlElement) -> Vec<String> {
    root.find_all("sp")
        .map(|shape| join_words(shape.find_all("t").map(|run| run.text())))
        .filter(|block| !block.is_empty())
        .collect()
}

/// Embedded pictures other than the background image, in document order.
fn pictures(
    root: &XmlElement,
    ctx: &PartContext<'_>,
    background_image: Option<&InlineMedia>,
) -> Vec<InlineMedia> {
    root.find_all("pic")
        .filter_map(|pic| pic.find_all("blip").find_map(|blip| blip.attr("embed")))
        .filter_map(|rel_id| ctx.media_for(rel_id))
        .filter(|media| background_image.map_or(true, |bg| bg.name != media.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::MediaTable;
    use crate::relationships::{Relationship, RelationshipMap};
    use crate::theme::ThemeColors;
    use deck_core::SlideLayout;

    fn shape(text_runs: &[&str]) -> String {
        let runs: String = text_runs
            .iter()
            .map(|t| format!("<a:r><a:t>{}</a:t></a:r>", t))
            .collect();
        format!("<p:sp><p:txBody><a:p>{}</a:p></p:txBody></p:sp>", runs)
    }

    fn slide_xml(bg: &str, body: &str) -> String {
        format!(
            r#"<p:sld xmlns:a="a" xmlns:p="p" xmlns:r="r"><p:cSld>{}<p:spTree>{}</p:spTree></p:cSld></p:sld>"#,
            bg, body
        )
    }

    fn media_rels() -> (RelationshipMap, MediaTable) {
        let mut rels = RelationshipMap::new();
        for (id, target) in [("rId2", "../media/image1.png"), ("rId3", "../media/image2.png")] {
            rels.insert_first(
                id,
                Relationship {
                    target: target.into(),
                    rel_type: String::new(),
                },
            );
        }
        let mut media = MediaTable::new();
        media.insert("image1.png", b"one");
        media.insert("image2.png", b"two");
        (rels, media)
    }

    #[test]
    fn test_three_blocks_make_content_layout() {
        let body = [
            shape(&["Q1 Results"]),
            shape(&["Revenue", "up 12%"]),
            shape(&["See appendix"]),
        ]
        .concat();
        let theme = ThemeColors::default();
        let rels = RelationshipMap::new();
        let media = MediaTable::new();
        let ctx = PartContext::new(&theme, &rels, &media);

        let slide = try_assemble_slide(&slide_xml("", &body), 1, &ctx, None).unwrap();
        assert_eq!(slide.title, "Q1 Results");
        assert_eq!(slide.subtitle, "Revenue up 12%");
        assert_eq!(slide.content, "See appendix");
        assert_eq!(slide.layout, SlideLayout::Content);
        assert_eq!(slide.background, Background::white());
        assert_eq!(slide.notes, "");
    }

    #[test]
    fn test_empty_shapes_are_skipped() {
        let body = [shape(&[" "]), shape(&["Only title"])].concat();
        let theme = ThemeColors::default();
        let rels = RelationshipMap::new();
        let media = MediaTable::new();
        let ctx = PartContext::new(&theme, &rels, &media);

        let slide = try_assemble_slide(&slide_xml("", &body), 2, &ctx, None).unwrap();
        assert_eq!(slide.title, "Only title");
        assert_eq!(slide.layout, SlideLayout::Title);

        let untitled = try_assemble_slide(&slide_xml("", ""), 5, &ctx, None).unwrap();
        assert_eq!(untitled.title, "Slide 5");
    }

    #[test]
    fn test_own_background_beats_inherited() {
        let theme = ThemeColors::default();
        let rels = RelationshipMap::new();
        let media = MediaTable::new();
        let ctx = PartContext::new(&theme, &rels, &media);
        let inherited = LevelBackground {
            fill: Some(Background::solid("#00ff00")),
            image: None,
        };

        let own = r#"<p:bg><p:bgPr><a:solidFill><a:srgbClr val="FF0000"/></a:solidFill></p:bgPr></p:bg>"#;
        let slide = try_assemble_slide(&slide_xml(own, ""), 1, &ctx, Some(&inherited)).unwrap();
        assert_eq!(slide.background, Background::solid("#ff0000"));

        let bare = try_assemble_slide(&slide_xml("", ""), 2, &ctx, Some(&inherited)).unwrap();
        assert_eq!(bare.background, Background::solid("#00ff00"));
    }

    #[test]
    fn test_broken_image_reference_falls_through() {
        let theme = ThemeColors::default();
        let rels = RelationshipMap::new();
        let media = MediaTable::new();
        let ctx = PartContext::new(&theme, &rels, &media);
        let inherited = LevelBackground {
            fill: Some(Background::solid("#123456")),
            image: None,
        };

        let own = r#"<p:bg><p:bgPr><a:blipFill><a:blip r:embed="rId42"/></a:blipFill></p:bgPr></p:bg>"#;
        let slide = try_assemble_slide(&slide_xml(own, ""), 1, &ctx, Some(&inherited)).unwrap();
        assert_eq!(slide.background_image, None);
        assert_eq!(slide.background, Background::solid("#123456"));
    }

    #[test]
    fn test_pictures_exclude_background_image() {
        let theme = ThemeColors::default();
        let (rels, media) = media_rels();
        let ctx = PartContext::new(&theme, &rels, &media);

        let bg = r#"<p:bg><p:bgPr><a:blipFill><a:blip r:embed="rId2"/></a:blipFill></p:bgPr></p:bg>"#;
        let body = r#"
            <p:pic><p:blipFill><a:blip r:embed="rId2"/></p:blipFill></p:pic>
            <p:pic><p:blipFill><a:blip r:embed="rId3"/></p:blipFill></p:pic>
            <p:pic><p:blipFill><a:blip r:embed="rId9"/></p:blipFill></p:pic>"#;
        let slide = try_assemble_slide(&slide_xml(bg, body), 1, &ctx, None).unwrap();

        assert_eq!(slide.background_image.as_ref().unwrap().name, "image1.png");
        let names: Vec<_> = slide.images.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["image2.png"]);
    }

    #[test]
    fn test_malformed_slide_becomes_placeholder() {
        let theme = ThemeColors::default();
        let rels = RelationshipMap::new();
        let media = MediaTable::new();
        let ctx = PartContext::new(&theme, &rels, &media);
        let inherited = LevelBackground {
            fill: Some(Background::solid("#222222")),
            image: None,
        };

        let result = try_assemble_slide("<p:sld><p:cSld></p:sld>", 3, &ctx, Some(&inherited));
        assert!(result.is_err());

        let slide = unreadable(3, Some(&inherited));
        assert_eq!(slide.id, 3);
        assert_eq!(slide.title, "Slide 3");
        assert_eq!(slide.content, "Could not parse slide content");
        assert_eq!(slide.background, Background::solid("#222222"));
    }
}
