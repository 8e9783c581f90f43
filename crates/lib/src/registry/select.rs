//! Artifact bundle selection.

use super::types::{Asset, Release};
use crate::consts::ARTIFACT_BUNDLE_SUFFIX;

/// Pick the first asset of `release` whose name ends in `.artifactbundle.zip`.
///
/// Returns `None` when the release carries no bundle; the caller decides how
/// to report that.
pub fn select_artifact_bundle(release: &Release) -> Option<&Asset> {
  release
    .assets
    .iter()
    .find(|asset| asset.name.ends_with(ARTIFACT_BUNDLE_SUFFIX))
}
