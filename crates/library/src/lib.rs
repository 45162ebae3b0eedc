//! Normalizing the contents of comic archives.
//!
//! - [`classify`] tags every file of an extracted archive (metadata, known
//!   promo, known duplicate, image, other) without touching it.
//! - The [`remove`] operations delete known promos, known duplicates and
//!   Comixology signature files.
//! - The [`pipeline`] drives extract, process and repack for whole archives,
//!   one at a time ([`Pipeline::process`]) or in parallel ([`normalize`]).

mod classify;
mod descriptor;
pub mod error;
pub mod pipeline;
pub mod remove;
#[cfg(test)]
mod test_util;
mod walk;

pub use crate::classify::{Category, Classification, ClassifiedFile, classify, cover_from_dir};
pub use crate::descriptor::{MetadataOverlay, write_metadata_to_dir};
pub use crate::pipeline::{NormalizeEvent, Operations, Outcome, Pipeline, Report, normalize};
pub use crate::remove::{
    HashRemoval, PromoRemoval, possible_promos, remove_comixology_meta, remove_hash_duplicates, remove_known_promos,
};
