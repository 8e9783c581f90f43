//! Shared test helpers for CLI tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// Get a Command for the bundlebump binary with a clean credential environment.
pub fn bundlebump_cmd() -> Command {
  let mut cmd = cargo_bin_cmd!("bundlebump");
  cmd.env_remove("GITHUB_TOKEN").env_remove("BUNDLEBUMP_REGISTRY_URL").env_remove("RUST_LOG");
  cmd
}

/// A package directory with a `manifest.json`.
pub struct TestPackage {
  pub temp: TempDir,
}

impl TestPackage {
  pub fn new(manifest: &serde_json::Value) -> Self {
    let temp = TempDir::new().unwrap();
    std::fs::write(
      temp.path().join("manifest.json"),
      serde_json::to_string_pretty(manifest).unwrap(),
    )
    .unwrap();
    Self { temp }
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.temp.path().join("manifest.json")
  }

  pub fn manifest_content(&self) -> String {
    std::fs::read_to_string(self.manifest_path()).unwrap()
  }

  pub fn manifest(&self) -> serde_json::Value {
    serde_json::from_str(&self.manifest_content()).unwrap()
  }
}

/// Manifest with one regular target and binary targets for `repos` under `acme`.
pub fn manifest_with_binaries(repos: &[(&str, &str)]) -> serde_json::Value {
  let mut targets = vec![serde_json::json!({ "name": "Tools", "type": "regular", "path": "Sources/Tools" })];
  for (name, repo) in repos {
    targets.push(serde_json::json!({
      "name": name,
      "type": "binary",
      "url": format!("https://github.com/acme/{}/releases/download/0.1.0/{}.artifactbundle.zip", repo, repo),
      "checksum": "00",
    }));
  }
  serde_json::json!({ "name": "BuildTools", "toolsVersion": "5.9", "targets": targets })
}

/// Register a latest release of `acme/<repo>` tagged `tag` with a bundle whose
/// content is `body`.
pub fn mock_release(server: &mut mockito::Server, repo: &str, tag: &str, body: &str) -> Vec<mockito::Mock> {
  let download_path = format!("/dl/{}/{}.artifactbundle.zip", tag, repo);
  let release = serde_json::json!({
    "id": 1,
    "tag_name": tag,
    "assets": [
      { "id": 1, "name": format!("{}.zip", repo), "browser_download_url": format!("{}/dl/{}/{}.zip", server.url(), tag, repo) },
      { "id": 2, "name": format!("{}.artifactbundle.zip", repo), "browser_download_url": format!("{}{}", server.url(), download_path) },
    ],
  });

  vec![
    server
      .mock("GET", format!("/repos/acme/{}/releases/latest", repo).as_str())
      .with_status(200)
      .with_body(release.to_string())
      .create(),
    server
      .mock("GET", download_path.as_str())
      .with_status(200)
      .with_body(body)
      .create(),
  ]
}
