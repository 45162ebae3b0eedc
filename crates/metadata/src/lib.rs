//! Comic metadata: the format-independent [`GenericMetadata`] model, reading
//! and writing ComicInfo.xml descriptors, merging two descriptors under a
//! [`Priority`], and filename helpers.

pub mod comicinfo;
mod consts;
mod document;
pub mod error;
mod merge;
pub mod models;
pub mod naming;

pub use crate::merge::{Merged, Priority, merge, merge_tracked};
pub use crate::models::{Credit, GenericMetadata, IssueRecord};
