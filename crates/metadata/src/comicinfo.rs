//! ComicInfo.xml reading and writing.
//!
//! The descriptor is a single `<ComicInfo>` root with flat, named child
//! elements. List-valued fields (genres and each credit role) are stored as
//! comma-separated text.

use crate::consts::{
    COMIC_INFO, COUNT, CREDIT_ELEMENTS, GENRE, NUMBER, PAGE_COUNT, PUBLISHER, SERIES, SUMMARY, TITLE, VOLUME, WEB, YEAR,
};
use crate::document;
use crate::error::{ErrorKind, Result};
use crate::models::{Credit, GenericMetadata};
use exn::ResultExt;
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::instrument;
use xmltree::{Element, XMLNode};

/// Conventional filename of the descriptor inside an archive.
pub const FILENAME: &str = "ComicInfo.xml";

/// Parse a ComicInfo.xml document.
///
/// Unknown elements are ignored, as are numeric fields that don't parse.
pub fn parse(xml: &str) -> Result<GenericMetadata> {
    let root = document::parse(xml)?;
    if root.name != COMIC_INFO {
        tracing::debug!(root = %root.name, "Unexpected descriptor root element");
    }
    let text = |name: &str| root.get_child(name).and_then(document::text);
    let number = |name: &str| text(name).and_then(|t| t.parse::<u32>().ok());
    let list = |name: &str| text(name).map(|t| split_list(&t)).unwrap_or_default();
    let credits = CREDIT_ELEMENTS
        .into_iter()
        .flat_map(|role| list(role).into_iter().map(move |person| Credit::new(person, role)))
        .collect();
    Ok(GenericMetadata {
        series: text(SERIES),
        title: text(TITLE),
        issue: text(NUMBER),
        issue_count: number(COUNT),
        volume: number(VOLUME),
        year: number(YEAR),
        publisher: text(PUBLISHER),
        genre: list(GENRE),
        comments: text(SUMMARY),
        page_count: number(PAGE_COUNT),
        credits,
        web_link: text(WEB),
        is_empty: true,
    }
    .refresh())
}

/// Serialize metadata into an indented ComicInfo.xml document.
pub fn to_xml(metadata: &GenericMetadata) -> Result<String> {
    let mut root = Element::new(COMIC_INFO);
    push(&mut root, TITLE, metadata.title.as_ref());
    push(&mut root, SERIES, metadata.series.as_ref());
    push(&mut root, NUMBER, metadata.issue.as_ref());
    push(&mut root, COUNT, metadata.issue_count.as_ref());
    push(&mut root, VOLUME, metadata.volume.as_ref());
    push(&mut root, SUMMARY, metadata.comments.as_ref());
    push(&mut root, YEAR, metadata.year.as_ref());
    for element in CREDIT_ELEMENTS {
        let people: Vec<&str> = metadata
            .credits
            .iter()
            .filter(|credit| credit.elements().contains(&element))
            .map(|credit| credit.person.as_str())
            .collect();
        push(&mut root, element, join_list(&people).as_ref());
    }
    push(&mut root, PUBLISHER, metadata.publisher.as_ref());
    push(&mut root, GENRE, join_list(&metadata.genre).as_ref());
    push(&mut root, WEB, metadata.web_link.as_ref());
    push(&mut root, PAGE_COUNT, metadata.page_count.as_ref());
    document::serialize(&root, true)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn read_file(path: impl AsRef<Path>) -> Result<GenericMetadata> {
    let xml = fs::read_to_string(path.as_ref()).or_raise(|| ErrorKind::Io)?;
    parse(&xml)
}

#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn write_file(metadata: &GenericMetadata, path: impl AsRef<Path>) -> Result<()> {
    let xml = to_xml(metadata)?;
    fs::write(path.as_ref(), xml).or_raise(|| ErrorKind::Io)
}

fn push(root: &mut Element, name: &str, value: Option<&impl Display>) {
    if let Some(value) = value {
        let mut element = Element::new(name);
        element.children.push(XMLNode::Text(value.to_string()));
        root.children.push(XMLNode::Element(element));
    }
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',').map(str::trim).filter(|s| !s.is_empty()).map(String::from).collect()
}

fn join_list<S: AsRef<str>>(items: &[S]) -> Option<String> {
    match items.is_empty() {
        true => None,
        false => Some(items.iter().map(AsRef::<str>::as_ref).collect::<Vec<_>>().join(", ")),
    }
}
