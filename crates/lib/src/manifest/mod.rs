//! Package manifest loading and regeneration.
//!
//! The manifest (`manifest.json`) lives at the root of a package directory.
//! It is read once per run and, only after every binary target resolved,
//! regenerated in full and swapped into place atomically.

mod file;
mod types;

pub use file::{ManifestError, load, manifest_path, save};
pub use types::*;
