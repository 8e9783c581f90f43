//! Resolution of a single binary target.
//!
//! Each target runs through the same fixed sequence: look up the latest
//! release, parse its tag, pick the artifact bundle, download and hash it.
//! The first failing step ends the task; nothing is retried.

use std::fmt;

use semver::Version;
use thiserror::Error;
use tracing::debug;

use crate::diagnostics::Diagnostics;
use crate::manifest::Target;
use crate::registry::{RegistryClient, RegistryError, RepoUrlError, parse_repo_url, select_artifact_bundle};
use crate::util::hash::{ContentHash, FetchError, fetch_and_hash};

/// A binary target eligible for updating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryTarget {
  pub name: String,
  /// URL the upstream repository is derived from.
  pub source_url: String,
}

/// The outcome of resolving one binary target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryDependency {
  pub name: String,
  /// Download URL of the selected artifact bundle.
  pub url: String,
  pub checksum: ContentHash,
  /// Version parsed from the release tag.
  pub version: Version,
}

impl BinaryDependency {
  /// Convert into the manifest's binary-target form. The version is not
  /// stored on the target.
  pub fn to_target(&self) -> Target {
    Target::binary(&self.name, &self.url, &self.checksum.0)
  }
}

/// Step of a dependency task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStage {
  /// Looking up the latest release and parsing its tag.
  Resolving,
  /// Picking the artifact bundle out of the release.
  Selecting,
  /// Downloading and hashing the bundle.
  Hashing,
}

impl fmt::Display for TaskStage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let name = match self {
      TaskStage::Resolving => "resolving",
      TaskStage::Selecting => "selecting",
      TaskStage::Hashing => "hashing",
    };
    f.write_str(name)
  }
}

/// Errors from resolving a single binary target.
#[derive(Debug, Error)]
pub enum DependencyError {
  #[error("cannot determine repository: {0}")]
  InvalidSourceUrl(#[from] RepoUrlError),

  #[error("release lookup failed: {0}")]
  Registry(#[from] RegistryError),

  #[error("unable to parse version from tag '{tag}': {source}")]
  VersionParse {
    tag: String,
    #[source]
    source: semver::Error,
  },

  #[error("cannot find artifact bundle in release {tag}")]
  AssetNotFound { tag: String },

  #[error("checksum download failed: {0}")]
  Fetch(#[from] FetchError),
}

impl DependencyError {
  /// The step at which the task stopped.
  pub fn stage(&self) -> TaskStage {
    match self {
      DependencyError::InvalidSourceUrl(_) | DependencyError::Registry(_) | DependencyError::VersionParse { .. } => {
        TaskStage::Resolving
      }
      DependencyError::AssetNotFound { .. } => TaskStage::Selecting,
      DependencyError::Fetch(_) => TaskStage::Hashing,
    }
  }
}

/// Parse a release tag as a semantic version.
///
/// A single leading `v` or `V` is ignored, so `v1.2.3` and `1.2.3` are equal.
pub fn parse_tag_version(tag: &str) -> Result<Version, semver::Error> {
  let trimmed = tag.strip_prefix(['v', 'V']).unwrap_or(tag);
  Version::parse(trimmed)
}

/// Resolve `target` to its latest release's artifact bundle.
pub async fn resolve_dependency(
  client: &RegistryClient,
  target: &BinaryTarget,
  diagnostics: &dyn Diagnostics,
) -> Result<BinaryDependency, DependencyError> {
  debug!(name = %target.name, stage = %TaskStage::Resolving, "starting");
  let repo = parse_repo_url(&target.source_url)?;
  let release = client.latest_release(&repo).await?;

  // Checked before downloading anything.
  let version = parse_tag_version(&release.tag).map_err(|source| DependencyError::VersionParse {
    tag: release.tag.clone(),
    source,
  })?;

  diagnostics.progress(&format!("found latest release for {}: {}", target.name, release.tag));

  debug!(name = %target.name, stage = %TaskStage::Selecting, tag = %release.tag);
  let asset = select_artifact_bundle(&release).ok_or_else(|| DependencyError::AssetNotFound {
    tag: release.tag.clone(),
  })?;

  debug!(name = %target.name, stage = %TaskStage::Hashing, asset = %asset.name);
  let checksum = fetch_and_hash(client.http(), &asset.download_url).await?;

  Ok(BinaryDependency {
    name: target.name.clone(),
    url: asset.download_url.clone(),
    checksum,
    version,
  })
}
