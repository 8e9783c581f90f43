//! Release types returned by the registry.

use serde::{Deserialize, Serialize};

/// A published release of a repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
  pub id: u64,

  /// Git tag the release was cut from (e.g. `v1.2.3`).
  #[serde(rename = "tag_name")]
  pub tag: String,

  /// Downloadable files, in the order the registry lists them.
  #[serde(default)]
  pub assets: Vec<Asset>,
}

/// A single downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
  pub id: u64,
  pub name: String,

  #[serde(rename = "browser_download_url")]
  pub download_url: String,
}

/// Owner and name of a repository on the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
  pub org: String,
  pub repo: String,
}

impl std::fmt::Display for RepoRef {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}/{}", self.org, self.repo)
  }
}
