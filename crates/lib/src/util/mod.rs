//! Shared utilities.
//!
//! Currently only content hashing of downloaded assets.

pub mod hash;
