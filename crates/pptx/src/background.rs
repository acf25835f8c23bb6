//! Background extraction for slide, layout, and master parts.
//!
//! Producers encode the same background in several shapes, so each
//! attribute (colour, gradient, image) is searched through an ordered list of
//! patterns and the first match wins.

use crate::context::PartContext;
use crate::xml::{self, hex_color, XmlElement};
use deck_core::{Background, FallbackChain, InlineMedia};

/// A colour as written in the markup: literal or theme slot reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorRef {
    Rgb(String),
    Scheme(String),
}

impl ColorRef {
    /// Read an `srgbClr` or `schemeClr` element.
    fn from_element(element: &XmlElement) -> Option<Self> {
        match element.name.as_str() {
            "srgbClr" => element.attr("val").and_then(hex_color).map(ColorRef::Rgb),
            "schemeClr" => element
                .attr("val")
                .filter(|v| !v.is_empty())
                .map(|v| ColorRef::Scheme(v.to_string())),
            _ => None,
        }
    }

    /// First colour child of `element`.
    fn first_child_of(element: &XmlElement) -> Option<Self> {
        element.elements().find_map(Self::from_element)
    }

    pub fn resolve(&self, ctx: &PartContext<'_>) -> String {
        match self {
            ColorRef::Rgb(color) => color.clone(),
            ColorRef::Scheme(name) => ctx.theme.resolve_scheme(name),
        }
    }
}

/// What one part says about its own background, before resolution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BackgroundDescriptor {
    pub color: Option<ColorRef>,
    /// Two or more stops.
    pub gradient: Option<Vec<ColorRef>>,
    pub image_ref: Option<String>,
}

impl BackgroundDescriptor {
    /// Parse XML text and extract its background; unparseable text yields
    /// an empty descriptor.
    pub fn from_xml(content: &str) -> Self {
        match xml::parse(content) {
            Ok(root) => Self::from_part(&root),
            Err(e) => {
                log::warn!("Ignoring background of unparseable part: {}", e);
                Self::default()
            }
        }
    }

    /// Extract the background from a parsed slide, layout, or master root.
    pub fn from_part(root: &XmlElement) -> Self {
        let Some(bg) = background_element(root) else {
            return Self::default();
        };

        let mut color = find_color(bg);
        let mut gradient = None;

        let stops = gradient_stops(bg);
        if stops.len() >= 2 {
            gradient = Some(stops);
            color = None;
        } else if let Some(stop) = stops.into_iter().next() {
            color.get_or_insert(stop);
        }

        Self {
            color,
            gradient,
            image_ref: find_image_ref(bg),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.gradient.is_none() && self.image_ref.is_none()
    }

    /// Turn references into concrete colours and media.
    pub fn resolve(&self, ctx: &PartContext<'_>) -> LevelBackground {
        let fill = match (&self.gradient, &self.color) {
            (Some(stops), _) => Some(Background::Gradient(
                stops.iter().map(|stop| stop.resolve(ctx)).collect(),
            )),
            (None, Some(color)) => Some(Background::Solid(color.resolve(ctx))),
            (None, None) => None,
        };
        let image = self.image_ref.as_deref().and_then(|id| ctx.media_for(id));

        LevelBackground { fill, image }
    }
}

/// A fully resolved background contributed by one cascade level.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LevelBackground {
    pub fill: Option<Background>,
    pub image: Option<InlineMedia>,
}

impl LevelBackground {
    /// True when this level says anything at all.
    pub fn is_definite(&self) -> bool {
        self.fill.is_some() || self.image.is_some()
    }

    /// `Some(self)` when definite, for use in a fallback chain.
    pub fn definite(self) -> Option<Self> {
        self.is_definite().then_some(self)
    }
}

fn background_element(root: &XmlElement) -> Option<&XmlElement> {
    if root.name == "bg" {
        return Some(root);
    }
    root.path(&["cSld", "bg"]).or_else(|| root.find("bg"))
}

/// Well-known background style indices mapped to theme slots.
fn scheme_for_style_index(idx: u32) -> &'static str {
    match idx {
        1 => "dk1",
        2 => "lt1",
        3 => "dk2",
        4 => "lt2",
        1001 => "accent1",
        1002 => "accent2",
        _ => "bg1",
    }
}

fn rgb_at(bg: &XmlElement, path: &[&str]) -> Option<ColorRef> {
    bg.path(path)
        .and_then(|e| e.attr("val"))
        .and_then(hex_color)
        .map(ColorRef::Rgb)
}

fn scheme_at(bg: &XmlElement, path: &[&str]) -> Option<ColorRef> {
    bg.path(path).and_then(ColorRef::from_element)
}

fn find_color(bg: &XmlElement) -> Option<ColorRef> {
    FallbackChain::new()
        .then("solidFill", || rgb_at(bg, &["solidFill", "srgbClr"]))
        .then("bgPr/solidFill", || rgb_at(bg, &["bgPr", "solidFill", "srgbClr"]))
        .then("schemeClr", || {
            scheme_at(bg, &["bgPr", "solidFill", "schemeClr"])
                .or_else(|| scheme_at(bg, &["solidFill", "schemeClr"]))
        })
        .then("bgRef color", || {
            bg.child("bgRef").and_then(ColorRef::first_child_of)
        })
        .then("bgRef idx", || {
            bg.child("bgRef")
                .and_then(|r| r.attr("idx"))
                .and_then(|idx| idx.trim().parse::<u32>().ok())
                .filter(|&idx| idx > 0)
                .map(|idx| ColorRef::Scheme(scheme_for_style_index(idx).to_string()))
        })
        .then("any solidFill", || {
            bg.find_all("solidFill").find_map(|fill| {
                fill.child("srgbClr")
                    .and_then(|c| c.attr("val"))
                    .and_then(hex_color)
                    .map(ColorRef::Rgb)
            })
        })
        .resolve()
}

fn gradient_stops(bg: &XmlElement) -> Vec<ColorRef> {
    let Some(grad) = bg.find("gradFill") else {
        return Vec::new();
    };

    let stops: Vec<ColorRef> = grad
        .find_all("gs")
        .filter_map(ColorRef::first_child_of)
        .collect();
    if !stops.is_empty() {
        return stops;
    }

    // No stop list; take literal colours in document order.
    grad.find_all("srgbClr")
        .filter_map(ColorRef::from_element)
        .collect()
}

fn embed_of(element: &XmlElement) -> Option<String> {
    element
        .attr("embed")
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}

fn find_image_ref(bg: &XmlElement) -> Option<String> {
    FallbackChain::new()
        .then("blipFill", || {
            bg.path(&["blipFill", "blip"]).and_then(embed_of)
        })
        .then("bgPr/blipFill", || {
            bg.path(&["bgPr", "blipFill", "blip"]).and_then(embed_of)
        })
        .then("any embed", || bg.descendants().find_map(embed_of))
        .resolve()
}
