//! Theme colour slots and scheme-colour resolution.

use crate::xml::{hex_color, XmlElement};
use deck_core::types::DEFAULT_BACKGROUND;
use deck_core::FallbackChain;

/// The fourteen named colour slots a scheme colour may refer to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThemeSlot {
    Dark1,
    Light1,
    Dark2,
    Light2,
    Accent1,
    Accent2,
    Accent3,
    Accent4,
    Accent5,
    Accent6,
    Background1,
    Background2,
    Text1,
    Text2,
}

impl ThemeSlot {
    pub const ALL: [ThemeSlot; 14] = [
        ThemeSlot::Dark1,
        ThemeSlot::Light1,
        ThemeSlot::Dark2,
        ThemeSlot::Light2,
        ThemeSlot::Accent1,
        ThemeSlot::Accent2,
        ThemeSlot::Accent3,
        ThemeSlot::Accent4,
        ThemeSlot::Accent5,
        ThemeSlot::Accent6,
        ThemeSlot::Background1,
        ThemeSlot::Background2,
        ThemeSlot::Text1,
        ThemeSlot::Text2,
    ];

    /// Element / attribute name used in DrawingML.
    pub fn xml_name(self) -> &'static str {
        match self {
            ThemeSlot::Dark1 => "dk1",
            ThemeSlot::Light1 => "lt1",
            ThemeSlot::Dark2 => "dk2",
            ThemeSlot::Light2 => "lt2",
            ThemeSlot::Accent1 => "accent1",
            ThemeSlot::Accent2 => "accent2",
            ThemeSlot::Accent3 => "accent3",
            ThemeSlot::Accent4 => "accent4",
            ThemeSlot::Accent5 => "accent5",
            ThemeSlot::Accent6 => "accent6",
            ThemeSlot::Background1 => "bg1",
            ThemeSlot::Background2 => "bg2",
            ThemeSlot::Text1 => "tx1",
            ThemeSlot::Text2 => "tx2",
        }
    }

    pub fn from_xml_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.xml_name() == name)
    }

    /// The standard Office palette value for this slot.
    fn default_color(self) -> &'static str {
        match self {
            ThemeSlot::Dark1 => "#000000",
            ThemeSlot::Light1 => "#ffffff",
            ThemeSlot::Dark2 => "#1f497d",
            ThemeSlot::Light2 => "#eeece1",
            ThemeSlot::Accent1 => "#4f81bd",
            ThemeSlot::Accent2 => "#c0504d",
            ThemeSlot::Accent3 => "#9bbb59",
            ThemeSlot::Accent4 => "#8064a2",
            ThemeSlot::Accent5 => "#4bacc6",
            ThemeSlot::Accent6 => "#f79646",
            ThemeSlot::Background1 => "#ffffff",
            ThemeSlot::Background2 => "#eeece1",
            ThemeSlot::Text1 => "#000000",
            ThemeSlot::Text2 => "#1f497d",
        }
    }

    fn index(self) -> usize {
        self as usize
    }

    /// Slots that a master colour map may redirect.
    fn is_alias(self) -> bool {
        matches!(
            self,
            ThemeSlot::Background1 | ThemeSlot::Background2 | ThemeSlot::Text1 | ThemeSlot::Text2
        )
    }
}

/// Resolved colours for every theme slot.
#[derive(Debug, Clone, PartialEq)]
pub struct ThemeColors {
    colors: [String; 14],
    /// Slots the theme part defined itself.
    explicit: [bool; 14],
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            colors: ThemeSlot::ALL.map(|slot| slot.default_color().to_string()),
            explicit: [false; 14],
        }
    }
}

impl ThemeColors {
    /// Read slot colours from a parsed theme part.
    ///
    /// Each slot takes its direct `srgbClr`, else the `lastClr` of a system
    /// colour. Slots the theme does not define keep the standard palette.
    pub fn from_theme(theme: Option<&XmlElement>) -> Self {
        let mut colors = Self::default();
        let Some(theme) = theme else {
            return colors;
        };
        let scheme = theme.find("clrScheme").unwrap_or(theme);

        for slot in ThemeSlot::ALL {
            let Some(definition) = scheme.find(slot.xml_name()) else {
                continue;
            };
            let resolved = FallbackChain::new()
                .then("srgbClr", || {
                    definition
                        .child("srgbClr")
                        .and_then(|c| c.attr("val"))
                        .and_then(hex_color)
                })
                .then("sysClr", || {
                    definition
                        .child("sysClr")
                        .and_then(|c| c.attr("lastClr"))
                        .and_then(hex_color)
                })
                .resolve();

            if let Some(color) = resolved {
                colors.colors[slot.index()] = color;
                colors.explicit[slot.index()] = true;
            }
        }

        colors
    }

    /// Apply a master `clrMap` (e.g. `bg1="lt1"`) to the alias slots the
    /// theme left undefined.
    pub fn with_color_map(mut self, color_map: Option<&XmlElement>) -> Self {
        let Some(color_map) = color_map else {
            return self;
        };

        for alias in ThemeSlot::ALL.into_iter().filter(|s| s.is_alias()) {
            if self.explicit[alias.index()] {
                continue;
            }
            let target = color_map
                .attr(alias.xml_name())
                .and_then(ThemeSlot::from_xml_name)
                .filter(|target| !target.is_alias());
            if let Some(target) = target {
                self.colors[alias.index()] = self.colors[target.index()].clone();
            }
        }

        self
    }

    pub fn get(&self, slot: ThemeSlot) -> &str {
        &self.colors[slot.index()]
    }

    pub fn set(&mut self, slot: ThemeSlot, color: impl Into<String>) {
        self.colors[slot.index()] = color.into();
        self.explicit[slot.index()] = true;
    }

    fn lookup(&self, name: &str) -> Option<String> {
        ThemeSlot::from_xml_name(name).map(|slot| self.get(slot).to_string())
    }

    /// Resolve a scheme colour name to a concrete colour.
    ///
    /// Names outside the fourteen slots (such as `phClr`) fall back through
    /// background1, then light1, then white.
    pub fn resolve_scheme(&self, name: &str) -> String {
        FallbackChain::new()
            .then("slot", || self.lookup(name))
            .then("bg1", || self.lookup("bg1"))
            .then("lt1", || self.lookup("lt1"))
            .resolve_or(DEFAULT_BACKGROUND.to_string())
    }
}
