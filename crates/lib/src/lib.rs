//! bundlebump-lib: keeps binary-target entries of a package manifest in sync
//! with the latest upstream releases.
//!
//! The pipeline is:
//! - `manifest`: load and atomically regenerate `manifest.json`
//! - `registry`: look up the latest release of a repository and pick its artifact bundle
//! - `util::hash`: download an asset and compute its SHA-256 checksum
//! - `update`: resolve every binary target concurrently, then merge the results back
//! - `report`: the sorted name -> version summary

pub mod consts;
pub mod credentials;
pub mod diagnostics;
pub mod manifest;
pub mod registry;
pub mod report;
pub mod update;
pub mod util;
