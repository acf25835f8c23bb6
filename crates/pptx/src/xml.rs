//! A small owned element tree built from quick-xml events.
//!
//! Names are stored without their namespace prefix so lookups tolerate
//! producers that pick different prefixes for the same namespace.

use deck_core::{Error, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// One XML element with its attributes and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct XmlElement {
    /// Local name (`bg` for `p:bg`).
    pub name: String,
    /// Attributes keyed by local name (`embed` for `r:embed`).
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlNode>,
}

/// A child of an element.
#[derive(Debug, Clone, PartialEq)]
pub enum XmlNode {
    Element(XmlElement),
    Text(String),
}

impl XmlElement {
    /// Value of the attribute with this local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct child elements, in document order.
    pub fn elements(&self) -> impl DoubleEndedIterator<Item = &XmlElement> {
        self.children.iter().filter_map(|node| match node {
            XmlNode::Element(element) => Some(element),
            XmlNode::Text(_) => None,
        })
    }

    /// First direct child with this name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.elements().find(|e| e.name == name)
    }

    /// Follow a chain of direct children, e.g. `["bgPr", "solidFill"]`.
    pub fn path(&self, names: &[&str]) -> Option<&XmlElement> {
        names
            .iter()
            .try_fold(self, |element, name| element.child(name))
    }

    /// Every element below this one, depth first in document order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.elements().rev().collect(),
        }
    }

    /// First descendant with this name.
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|e| e.name == name)
    }

    /// All descendants with this name, in document order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> + 'a {
        self.descendants().filter(move |e| e.name == name)
    }

    /// Concatenated text of direct text children.
    pub fn text(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                XmlNode::Text(text) => Some(text.as_str()),
                XmlNode::Element(_) => None,
            })
            .collect()
    }
}

/// Depth-first iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.elements().rev());
        Some(element)
    }
}

/// Parse a complete document and return its root element.
///
/// Mismatched or unclosed tags are errors; callers decide whether that
/// costs them a slide or just one contributing part.
pub fn parse(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(element_from_start(e)),
            Ok(Event::Empty(ref e)) => {
                let element = element_from_start(e);
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| Error::XmlError("unexpected closing tag".to_string()))?;
                attach(&mut stack, &mut root, element);
            }
            Ok(Event::Text(ref e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = e
                        .unescape()
                        .map_err(|err| Error::XmlError(format!("bad text content: {}", err)))?;
                    parent.children.push(XmlNode::Text(text.into_owned()));
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(parent) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    parent.children.push(XmlNode::Text(text));
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::XmlError(format!(
                    "error at position {}: {}",
                    reader.buffer_position(),
                    e
                )));
            }
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(Error::XmlError(format!(
            "document ended with {} unclosed element(s)",
            stack.len()
        )));
    }

    root.ok_or_else(|| Error::XmlError("document has no root element".to_string()))
}

fn element_from_start(e: &BytesStart<'_>) -> XmlElement {
    let name = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
    let attributes = e
        .attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map(|v| v.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).into_owned());
            (key, value)
        })
        .collect();

    XmlElement {
        name,
        attributes,
        children: Vec::new(),
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => {
            if root.is_none() {
                *root = Some(element);
            }
        }
    }
}

/// Normalise a 6-digit hex colour value to `#rrggbb`.
pub fn hex_color(value: &str) -> Option<String> {
    let value = value.trim();
    if value.len() == 6 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(format!("#{}", value.to_ascii_lowercase()))
    } else {
        None
    }
}
