//! Extract, transform and repack whole archives.
//!
//! One archive moves through these stages in order, never overlapping:
//!
//! 1. **Extract** into a scratch [`Workspace`](cbnorm_archive::Workspace).
//! 2. **Process**: classify the workspace, then apply the requested
//!    [`Operations`].
//! 3. **Repack** over the original archive, but only if something actually
//!    changed. Otherwise the workspace is discarded and the archive is
//!    reported [unchanged](Outcome::Unchanged).
//!
//! A failure at any stage aborts that archive with an error naming the stage.
//! The original archive is left byte-for-byte untouched, and the workspace is
//! deleted on every path because it is owned by the run.
//!
//! Archives share nothing but the read-only [`Registry`](cbnorm_config::Registry),
//! so [`normalize`] runs many of them in parallel.

mod process;
mod stream;

pub use self::process::{Operations, Outcome, Pipeline, Report};
pub use self::stream::{NormalizeEvent, normalize};
