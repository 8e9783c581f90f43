//! Reading and writing `manifest.json`.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::types::Manifest;
use crate::consts::MANIFEST_FILENAME;

/// Errors that can occur when loading or writing a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
  /// Failed to read the manifest file.
  #[error("failed to read manifest '{}': {source}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },

  /// The manifest is not valid JSON or is missing required fields.
  #[error("failed to parse manifest '{}': {source}", path.display())]
  Parse {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  /// Failed to render the manifest.
  #[error("failed to serialize manifest: {0}")]
  Serialize(#[source] serde_json::Error),

  /// Failed to write or replace the manifest file.
  #[error("failed to write manifest '{}': {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
}

/// Path of the manifest inside `package_dir`.
pub fn manifest_path(package_dir: &Path) -> PathBuf {
  package_dir.join(MANIFEST_FILENAME)
}

/// Load the manifest of the package rooted at `package_dir`.
pub fn load(package_dir: &Path) -> Result<Manifest, ManifestError> {
  let path = manifest_path(package_dir);
  let content = fs::read_to_string(&path).map_err(|source| ManifestError::Read {
    path: path.clone(),
    source,
  })?;

  let manifest: Manifest = serde_json::from_str(&content).map_err(|source| ManifestError::Parse {
    path: path.clone(),
    source,
  })?;

  debug!(path = %path.display(), targets = manifest.targets.len(), "loaded manifest");
  Ok(manifest)
}

/// Regenerate the manifest file of the package rooted at `package_dir`.
///
/// The content is written to a temporary file in the same directory and then
/// renamed over the existing manifest, so readers never observe a partial file.
/// The replaced file's permissions carry over; a new manifest gets `0644` on
/// Unix. Returns the path of the written manifest.
///
/// Top-level keys are written as `name`, the remaining package fields in
/// their original order, then `targets`. A manifest that lists `targets`
/// earlier has its keys reordered, never their values.
pub fn save(manifest: &Manifest, package_dir: &Path) -> Result<PathBuf, ManifestError> {
  let path = manifest_path(package_dir);
  let mut content = serde_json::to_string_pretty(manifest).map_err(ManifestError::Serialize)?;
  content.push('\n');

  let write_err = |source: io::Error| ManifestError::Write {
    path: path.clone(),
    source,
  };

  let mut temp = NamedTempFile::new_in(package_dir).map_err(write_err)?;
  temp.write_all(content.as_bytes()).map_err(write_err)?;
  temp.flush().map_err(write_err)?;

  // Temp files are created owner-only.
  let permissions = match fs::metadata(&path) {
    Ok(metadata) => Some(metadata.permissions()),
    Err(_) => default_permissions(),
  };
  if let Some(permissions) = permissions {
    temp.as_file().set_permissions(permissions).map_err(write_err)?;
  }
  temp.persist(&path).map_err(|e| write_err(e.error))?;

  debug!(path = %path.display(), bytes = content.len(), "wrote manifest");
  Ok(path)
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
  use std::os::unix::fs::PermissionsExt;
  Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
  None
}
