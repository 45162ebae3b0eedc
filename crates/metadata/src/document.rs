//! Thin helpers around [`xmltree`] shared by the ComicInfo codec and the merger.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use xmltree::{EmitterConfig, Element, XMLNode};

pub(crate) fn parse(xml: &str) -> Result<Element> {
    Element::parse(xml.as_bytes()).or_raise(|| ErrorKind::MalformedXml)
}

pub(crate) fn serialize(element: &Element, indent: bool) -> Result<String> {
    let config = EmitterConfig::new().perform_indent(indent).write_document_declaration(true);
    let mut buffer = Vec::new();
    element.write_with_config(&mut buffer, config).or_raise(|| ErrorKind::Serialize)?;
    String::from_utf8(buffer).or_raise(|| ErrorKind::Serialize)
}

/// Trimmed text content of an element, `None` when blank.
pub(crate) fn text(element: &Element) -> Option<String> {
    element.get_text().map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

/// Replace the character data of `element`, leaving child elements in place.
pub(crate) fn set_text(element: &mut Element, text: Option<String>) {
    element.children.retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    if let Some(text) = text {
        element.children.insert(0, XMLNode::Text(text));
    }
}

/// Direct child elements, skipping text, comments and processing instructions.
pub(crate) fn child_elements(element: &Element) -> impl Iterator<Item = &Element> {
    element.children.iter().filter_map(|node| match node {
        XMLNode::Element(e) => Some(e),
        _ => None,
    })
}
