//! Folding resolved dependencies back into a manifest.

use std::collections::HashSet;

use thiserror::Error;
use tracing::debug;

use super::task::BinaryDependency;
use crate::manifest::Manifest;

/// Errors from merging resolved dependencies into a manifest.
#[derive(Debug, Error)]
pub enum MergeError {
  #[error("target '{name}' would appear more than once in the manifest")]
  DuplicateTarget { name: String },
}

/// Build the updated manifest.
///
/// Every binary target of `original` is dropped, whether or not it was
/// resolved. Non-binary targets keep their relative order and are followed by
/// one binary target per entry of `resolved`, sorted by name (byte order).
/// All other manifest fields are copied unchanged.
///
/// # Errors
///
/// Returns [`MergeError::DuplicateTarget`] if a name would occur twice in the
/// merged target list.
pub fn merge(original: &Manifest, resolved: &[BinaryDependency]) -> Result<Manifest, MergeError> {
  let mut binaries: Vec<&BinaryDependency> = resolved.iter().collect();
  binaries.sort_by(|a, b| a.name.cmp(&b.name));

  let targets: Vec<_> = original
    .targets
    .iter()
    .filter(|target| !target.is_binary())
    .cloned()
    .chain(binaries.into_iter().map(BinaryDependency::to_target))
    .collect();

  let mut seen = HashSet::with_capacity(targets.len());
  for target in &targets {
    if !seen.insert(target.name.as_str()) {
      return Err(MergeError::DuplicateTarget {
        name: target.name.clone(),
      });
    }
  }

  debug!(
    removed = original.binary_targets().count(),
    added = resolved.len(),
    total = targets.len(),
    "merged manifest targets"
  );

  Ok(Manifest {
    name: original.name.clone(),
    fields: original.fields.clone(),
    targets,
  })
}
