//! Manifest types for bundlebump.
//!
//! A package manifest is a JSON document with a `name`, a list of `targets`,
//! and any number of other package-level fields. Only binary targets are ever
//! rewritten; everything else is carried through untouched.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "BuildTools",
//!   "platforms": [{ "platformName": "macos", "version": "13.0" }],
//!   "targets": [
//!     { "name": "Tools", "type": "regular", "path": "Sources/Tools" },
//!     {
//!       "name": "SwiftLintBinary",
//!       "type": "binary",
//!       "url": "https://github.com/realm/SwiftLint/releases/download/0.57.0/SwiftLintBinary.artifactbundle.zip",
//!       "checksum": "a1b2c3..."
//!     }
//!   ]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The `type` value marking a binary target.
const BINARY_KIND: &str = "binary";

/// A loaded package manifest.
///
/// Fields other than `name` and `targets` are kept in `fields` exactly as they
/// were read, in their original order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
  /// Package name.
  pub name: String,

  /// Every other package-level field (platforms, dependencies, products, ...).
  #[serde(flatten)]
  pub fields: Map<String, Value>,

  /// Declared targets, in manifest order.
  #[serde(default)]
  pub targets: Vec<Target>,
}

/// A single target entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
  pub name: String,

  #[serde(rename = "type")]
  pub kind: TargetKind,

  /// Remote artifact URL (binary targets).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub url: Option<String>,

  /// Hex SHA-256 of the artifact at `url` (binary targets).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub checksum: Option<String>,

  /// Remaining target fields (path, dependencies, settings, ...).
  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

/// Target kind as written in the manifest.
///
/// Only `binary` matters to the updater; any other kind keeps its original
/// spelling so it round-trips verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TargetKind {
  Binary,
  Other(String),
}

impl TargetKind {
  pub fn is_binary(&self) -> bool {
    matches!(self, TargetKind::Binary)
  }

  pub fn as_str(&self) -> &str {
    match self {
      TargetKind::Binary => BINARY_KIND,
      TargetKind::Other(kind) => kind,
    }
  }
}

impl From<String> for TargetKind {
  fn from(kind: String) -> Self {
    if kind == BINARY_KIND {
      TargetKind::Binary
    } else {
      TargetKind::Other(kind)
    }
  }
}

impl From<TargetKind> for String {
  fn from(kind: TargetKind) -> Self {
    match kind {
      TargetKind::Binary => BINARY_KIND.to_string(),
      TargetKind::Other(kind) => kind,
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Target {
  /// Create a binary target pointing at a remote artifact.
  pub fn binary(name: impl Into<String>, url: impl Into<String>, checksum: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      kind: TargetKind::Binary,
      url: Some(url.into()),
      checksum: Some(checksum.into()),
      fields: Map::new(),
    }
  }

  pub fn is_binary(&self) -> bool {
    self.kind.is_binary()
  }
}

impl Manifest {
  /// Create a manifest with no targets and no extra fields.
  pub fn new(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      fields: Map::new(),
      targets: Vec::new(),
    }
  }

  /// Iterate over the binary targets, in manifest order.
  pub fn binary_targets(&self) -> impl Iterator<Item = &Target> {
    self.targets.iter().filter(|t| t.is_binary())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn target_kind_round_trips_unknown_spelling() {
    let target: Target = serde_json::from_value(json!({
      "name": "Macros",
      "type": "macro",
      "path": "Sources/Macros",
    }))
    .unwrap();

    assert_eq!(target.kind, TargetKind::Other("macro".to_string()));
    assert_eq!(
      serde_json::to_value(&target).unwrap(),
      json!({ "name": "Macros", "type": "macro", "path": "Sources/Macros" })
    );
  }

  #[test]
  fn binary_kind_is_recognized() {
    let target: Target = serde_json::from_value(json!({
      "name": "Lint",
      "type": "binary",
      "url": "https://example.com/lint.artifactbundle.zip",
      "checksum": "00",
    }))
    .unwrap();

    assert!(target.is_binary());
    assert_eq!(target.url.as_deref(), Some("https://example.com/lint.artifactbundle.zip"));
  }

  #[test]
  fn manifest_keeps_extra_fields_in_order() {
    let raw = r#"{"name":"Pkg","toolsVersion":"5.9","platforms":[{"platformName":"macos"}],"products":[],"targets":[]}"#;
    let manifest: Manifest = serde_json::from_str(raw).unwrap();

    let keys: Vec<_> = manifest.fields.keys().cloned().collect();
    assert_eq!(keys, vec!["toolsVersion", "platforms", "products"]);
  }

  #[test]
  fn binary_targets_filters_by_kind() {
    let mut manifest = Manifest::new("Pkg");
    manifest.targets.push(Target::binary("A", "https://example.com/a", "aa"));
    manifest.targets.push(Target {
      name: "Core".to_string(),
      kind: TargetKind::Other("regular".to_string()),
      url: None,
      checksum: None,
      fields: Map::new(),
    });

    let names: Vec<_> = manifest.binary_targets().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["A"]);
  }

  #[test]
  fn binary_target_serializes_only_core_fields() {
    let target = Target::binary("A", "https://example.com/a.zip", "abc");
    assert_eq!(
      serde_json::to_value(&target).unwrap(),
      json!({ "name": "A", "type": "binary", "url": "https://example.com/a.zip", "checksum": "abc" })
    );
  }
}
