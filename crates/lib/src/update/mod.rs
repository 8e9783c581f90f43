//! Updating the binary targets of a package.
//!
//! [`update_package`] drives a full run: load the manifest, resolve every
//! binary target concurrently, merge the results and regenerate the manifest.
//! The manifest is only written once every target resolved successfully.
//!
//! # Modules
//!
//! - [`task`] - Resolution of a single target (release, bundle, checksum)
//! - [`resolve`] - Concurrent fan-out over all targets, failing fast
//! - [`merge`] - Replacing the binary targets of a manifest

mod merge;
mod resolve;
mod task;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tracing::info;

pub use merge::{MergeError, merge};
pub use resolve::{discover_targets, resolve_binary_dependencies};
pub use task::{BinaryDependency, BinaryTarget, DependencyError, TaskStage, parse_tag_version, resolve_dependency};

use crate::diagnostics::Diagnostics;
use crate::manifest::{self, Manifest, ManifestError};
use crate::registry::{RegistryClient, RegistryConfig, RegistryError};

/// Errors that end an update run.
#[derive(Debug, Error)]
pub enum UpdateError {
  #[error(transparent)]
  Manifest(#[from] ManifestError),

  #[error(transparent)]
  Client(#[from] RegistryError),

  /// A single target failed; every other target's result was discarded.
  #[error("failed to update '{name}' while {stage}: {source}")]
  Dependency {
    name: String,
    stage: TaskStage,
    #[source]
    source: DependencyError,
  },

  #[error("resolution task panicked: {0}")]
  TaskPanicked(String),

  #[error(transparent)]
  Merge(#[from] MergeError),
}

/// Options for [`update_package`].
#[derive(Debug, Clone, Default)]
pub struct UpdateOptions {
  /// Only resolve the binary target with this name.
  pub target: Option<String>,
  /// Resolve and merge, but leave the manifest file untouched.
  pub dry_run: bool,
}

/// Result of a successful run.
#[derive(Debug)]
pub struct UpdateOutcome {
  /// Resolved dependencies, sorted by name.
  pub dependencies: Vec<BinaryDependency>,
  /// The merged manifest.
  pub manifest: Manifest,
  /// Location of the manifest file.
  pub manifest_path: PathBuf,
  /// Whether the manifest file was rewritten.
  pub written: bool,
}

/// Update the binary targets of the package rooted at `package_dir`.
///
/// # Errors
///
/// Fails if the manifest cannot be loaded or written, the registry client
/// cannot be built, any target fails to resolve, or the merge would produce
/// duplicate target names. On any failure the manifest file is left as it was.
pub async fn update_package(
  package_dir: &Path,
  options: &UpdateOptions,
  config: &RegistryConfig,
  diagnostics: Arc<dyn Diagnostics>,
) -> Result<UpdateOutcome, UpdateError> {
  let original = manifest::load(package_dir)?;
  let client = RegistryClient::new(config)?;

  info!(
    package = %original.name,
    targets = original.targets.len(),
    authenticated = client.is_authenticated(),
    "updating binary targets"
  );

  let dependencies =
    resolve_binary_dependencies(&client, &original.targets, options.target.as_deref(), diagnostics).await?;
  let merged = merge(&original, &dependencies)?;

  let (manifest_path, written) = if options.dry_run {
    info!("dry run, manifest not written");
    (manifest::manifest_path(package_dir), false)
  } else {
    (manifest::save(&merged, package_dir)?, true)
  };

  Ok(UpdateOutcome {
    dependencies,
    manifest: merged,
    manifest_path,
    written,
  })
}
