//! Configuration for cbnorm.
//!
//! Two independent sources of configuration:
//!
//! - the [`Registry`]: known promo names, metadata filenames and file hashes,
//!   read from a JSON side file and shared read-only by every pipeline run;
//! - the [`Settings`]: layered application options (defaults, TOML file,
//!   environment).

pub mod error;
mod registry;
mod settings;

pub use crate::registry::Registry;
pub use crate::settings::Settings;
