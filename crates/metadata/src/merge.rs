//! Shallow, element-name keyed merge of two metadata documents.

use crate::document;
use crate::error::Result;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;
use tracing::instrument;
use xmltree::{Element, XMLNode};

/// Which document's values win when both define the same element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Priority {
    Base,
    #[default]
    Overlay,
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Base => write!(f, "base"),
            Self::Overlay => write!(f, "overlay"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(Self::Base),
            "overlay" => Ok(Self::Overlay),
            other => Err(format!("unknown priority {other:?}, expected \"base\" or \"overlay\"")),
        }
    }
}

/// A merged document and whether it differs from the base document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Merged {
    pub xml: String,
    pub changed: bool,
}

/// Merge two metadata documents and serialize the result.
///
/// Every top-level child of the priority document either overwrites the text
/// of the same-named element in the other document or, when no such element
/// exists, is appended to it. Elements only the other document defines are
/// kept as they are. The returned text is the other document, mutated.
///
/// ```
/// use cbnorm_metadata::{Priority, merge};
///
/// let merged = merge("<C><A>1</A></C>", "<C><A>2</A></C>", Priority::Overlay).unwrap();
/// assert!(merged.contains("<A>2</A>"));
/// ```
pub fn merge(base: &str, overlay: &str, priority: Priority) -> Result<String> {
    merge_tracked(base, overlay, priority).map(|merged| merged.xml)
}

/// [`merge`], also reporting whether the result differs from `base`.
///
/// Top-level elements are compared irrespective of their order.
#[instrument(skip_all, fields(%priority))]
pub fn merge_tracked(base: &str, overlay: &str, priority: Priority) -> Result<Merged> {
    let base = document::parse(base)?;
    let overlay = document::parse(overlay)?;
    let original = base.clone();
    let (winner, mut target) = match priority {
        Priority::Base => (base, overlay),
        Priority::Overlay => (overlay, base),
    };
    merge_elements(&winner, &mut target);
    let changed = !same_children(&original, &target);
    Ok(Merged { xml: document::serialize(&target, false)?, changed })
}

/// Apply the children of `priority` onto `target` in document order.
///
/// Names repeated within `priority` are applied one after the other, so the
/// last occurrence decides the final text. Only the first same-named child of
/// `target` is ever updated.
pub(crate) fn merge_elements(priority: &Element, target: &mut Element) {
    for element in document::child_elements(priority) {
        match target.get_mut_child(element.name.as_str()) {
            Some(existing) => {
                let text = element.get_text().map(|t| t.into_owned());
                document::set_text(existing, text);
            },
            None => {
                tracing::trace!(element = %element.name, "Appending element missing from target");
                target.children.push(XMLNode::Element(element.clone()));
            },
        }
    }
}

/// Same top-level child elements, in any order.
fn same_children(a: &Element, b: &Element) -> bool {
    let mut unmatched: Vec<&Element> = document::child_elements(b).collect();
    for element in document::child_elements(a) {
        match unmatched.iter().position(|other| *other == element) {
            Some(index) => {
                unmatched.swap_remove(index);
            },
            None => return false,
        }
    }
    unmatched.is_empty()
}
