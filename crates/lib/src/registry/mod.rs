//! Release registry client.
//!
//! Looks up the latest published release of a repository through the
//! `GET /repos/{org}/{repo}/releases/latest` endpoint. The same client is used
//! with or without a bearer token; without one, requests are anonymous and
//! subject to the registry's stricter rate limits.
//!
//! # Modules
//!
//! - [`types`] - Release and asset wire types
//! - [`select`] - Picking the artifact bundle out of a release

mod select;
mod types;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use thiserror::Error;
use tracing::debug;

pub use select::select_artifact_bundle;
pub use types::{Asset, Release, RepoRef};

use crate::consts::{DEFAULT_REGISTRY_URL, DEFAULT_TIMEOUT_SECS, REGISTRY_API_VERSION, REGISTRY_URL_ENV, USER_AGENT};
use crate::credentials::github_token;

const REGISTRY_ACCEPT: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "x-github-api-version";

/// Errors that can occur while talking to the registry.
#[derive(Debug, Error)]
pub enum RegistryError {
  /// The HTTP client could not be constructed.
  #[error("failed to build HTTP client: {0}")]
  Client(#[source] reqwest::Error),

  /// The request could not be sent or the body could not be read.
  #[error("request to {url} failed: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The registry answered with a non-success status.
  #[error("registry returned HTTP {status} for {url}")]
  Status { url: String, status: u16 },

  /// The response body did not match the release schema.
  #[error("failed to decode release from {url}: {source}")]
  Decode {
    url: String,
    #[source]
    source: serde_json::Error,
  },
}

/// Errors from extracting a repository out of a target URL.
#[derive(Debug, Error)]
pub enum RepoUrlError {
  #[error("invalid URL '{url}': {reason}")]
  Invalid { url: String, reason: String },

  #[error("URL '{url}' does not name an organization and repository")]
  MissingRepo { url: String },
}

/// Settings for [`RegistryClient`].
#[derive(Clone)]
pub struct RegistryConfig {
  /// Registry API root, without a trailing `/repos`.
  pub base_url: String,
  /// Bearer token; `None` means anonymous access.
  pub token: Option<String>,
  /// Per-request timeout, covering both release lookups and downloads.
  pub timeout: Duration,
}

impl Default for RegistryConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_REGISTRY_URL.to_string(),
      token: None,
      timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
    }
  }
}

impl std::fmt::Debug for RegistryConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RegistryConfig")
      .field("base_url", &self.base_url)
      .field("token", &self.token.as_ref().map(|_| "<redacted>"))
      .field("timeout", &self.timeout)
      .finish()
  }
}

impl RegistryConfig {
  /// Build a config from the environment.
  ///
  /// Uses `BUNDLEBUMP_REGISTRY_URL` for the base URL when set and looks the
  /// token up via [`github_token`].
  pub fn from_env() -> Self {
    let base_url = std::env::var(REGISTRY_URL_ENV)
      .ok()
      .filter(|url| !url.trim().is_empty())
      .unwrap_or_else(|| DEFAULT_REGISTRY_URL.to_string());

    Self {
      base_url,
      token: github_token(),
      ..Self::default()
    }
  }
}

/// Client for the release registry and for asset downloads.
///
/// Cheap to clone: the underlying connection pool is shared.
#[derive(Clone)]
pub struct RegistryClient {
  http: Client,
  base_url: String,
  token: Option<String>,
}

impl std::fmt::Debug for RegistryClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("RegistryClient")
      .field("base_url", &self.base_url)
      .field("authenticated", &self.token.is_some())
      .finish()
  }
}

impl RegistryClient {
  pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
    let http = Client::builder()
      .user_agent(USER_AGENT)
      .timeout(config.timeout)
      .build()
      .map_err(RegistryError::Client)?;

    Ok(Self {
      http,
      base_url: config.base_url.trim_end_matches('/').to_string(),
      token: config.token.clone(),
    })
  }

  /// The underlying HTTP client, for plain asset downloads.
  pub fn http(&self) -> &Client {
    &self.http
  }

  pub fn is_authenticated(&self) -> bool {
    self.token.is_some()
  }

  /// URL of the latest-release endpoint for `repo`.
  pub fn latest_release_url(&self, repo: &RepoRef) -> String {
    format!("{}/repos/{}/{}/releases/latest", self.base_url, repo.org, repo.repo)
  }

  /// Fetch the latest release of `repo`.
  ///
  /// "Latest" is the registry's notion: the most recent non-draft,
  /// non-prerelease release.
  pub async fn latest_release(&self, repo: &RepoRef) -> Result<Release, RegistryError> {
    let url = self.latest_release_url(repo);
    debug!(url = %url, authenticated = self.is_authenticated(), "requesting latest release");

    // API headers are per request; the same client downloads assets from other hosts.
    let mut request = self
      .http
      .get(&url)
      .header(ACCEPT, REGISTRY_ACCEPT)
      .header(API_VERSION_HEADER, REGISTRY_API_VERSION);
    if let Some(token) = &self.token {
      request = request.header(AUTHORIZATION, format!("Bearer {}", token));
    }

    let response = request.send().await.map_err(|source| RegistryError::Request {
      url: url.clone(),
      source,
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(RegistryError::Status {
        url,
        status: status.as_u16(),
      });
    }

    let body = response.bytes().await.map_err(|source| RegistryError::Request {
      url: url.clone(),
      source,
    })?;

    let release: Release = serde_json::from_slice(&body).map_err(|source| RegistryError::Decode {
      url: url.clone(),
      source,
    })?;

    debug!(url = %url, tag = %release.tag, assets = release.assets.len(), "received release");
    Ok(release)
  }
}

/// Extract the organization and repository from a target URL.
///
/// The first two path segments are used, so both repository URLs
/// (`https://github.com/org/repo`) and earlier release download URLs
/// (`https://github.com/org/repo/releases/download/1.0.0/x.zip`) work.
pub fn parse_repo_url(url: &str) -> Result<RepoRef, RepoUrlError> {
  let parsed = Url::parse(url).map_err(|e| RepoUrlError::Invalid {
    url: url.to_string(),
    reason: e.to_string(),
  })?;

  let mut segments = parsed
    .path_segments()
    .into_iter()
    .flatten()
    .filter(|segment| !segment.is_empty());

  match (segments.next(), segments.next()) {
    (Some(org), Some(repo)) => Ok(RepoRef {
      org: org.to_string(),
      repo: repo.strip_suffix(".git").unwrap_or(repo).to_string(),
    }),
    _ => Err(RepoUrlError::MissingRepo { url: url.to_string() }),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use mockito::Matcher;

  const RELEASE_BODY: &str = r#"{
    "id": 1001,
    "tag_name": "v1.2.3",
    "assets": [
      { "id": 1, "name": "tool.zip", "browser_download_url": "https://example.com/tool.zip" },
      { "id": 2, "name": "tool.artifactbundle.zip", "browser_download_url": "https://example.com/tool.artifactbundle.zip" }
    ]
  }"#;

  fn client_for(server: &mockito::Server, token: Option<&str>) -> RegistryClient {
    RegistryClient::new(&RegistryConfig {
      base_url: server.url(),
      token: token.map(str::to_string),
      ..RegistryConfig::default()
    })
    .unwrap()
  }

  fn repo() -> RepoRef {
    RepoRef {
      org: "acme".to_string(),
      repo: "tool".to_string(),
    }
  }

  mod parse_repo_url_tests {
    use super::*;

    #[test]
    fn release_download_url() {
      let repo =
        parse_repo_url("https://github.com/realm/SwiftLint/releases/download/0.57.0/SwiftLintBinary.artifactbundle.zip")
          .unwrap();
      assert_eq!(repo.org, "realm");
      assert_eq!(repo.repo, "SwiftLint");
    }

    #[test]
    fn plain_repo_url_with_git_suffix() {
      let repo = parse_repo_url("https://github.com/acme/tool.git").unwrap();
      assert_eq!(repo.to_string(), "acme/tool");
    }

    #[test]
    fn url_without_repo_is_rejected() {
      let result = parse_repo_url("https://github.com/acme");
      assert!(matches!(result, Err(RepoUrlError::MissingRepo { .. })));
    }

    #[test]
    fn garbage_is_rejected() {
      let result = parse_repo_url("not a url");
      assert!(matches!(result, Err(RepoUrlError::Invalid { .. })));
    }
  }

  mod latest_release_tests {
    use super::*;

    #[tokio::test]
    async fn sends_bearer_token_when_configured() {
      let mut server = mockito::Server::new_async().await;
      let mock = server
        .mock("GET", "/repos/acme/tool/releases/latest")
        .match_header("authorization", "Bearer secret-token")
        .match_header("user-agent", USER_AGENT)
        .match_header("accept", REGISTRY_ACCEPT)
        .match_header("x-github-api-version", REGISTRY_API_VERSION)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(RELEASE_BODY)
        .create_async()
        .await;

      let release = client_for(&server, Some("secret-token"))
        .latest_release(&repo())
        .await
        .unwrap();

      assert_eq!(release.tag, "v1.2.3");
      assert_eq!(release.assets.len(), 2);
      mock.assert_async().await;
    }

    #[tokio::test]
    async fn anonymous_request_has_no_authorization_header() {
      let mut server = mockito::Server::new_async().await;
      let mock = server
        .mock("GET", "/repos/acme/tool/releases/latest")
        .match_header("authorization", Matcher::Missing)
        .with_status(200)
        .with_body(RELEASE_BODY)
        .create_async()
        .await;

      let release = client_for(&server, None).latest_release(&repo()).await.unwrap();
      assert_eq!(release.id, 1001);
      mock.assert_async().await;
    }

    #[tokio::test]
    async fn asset_downloads_carry_no_api_headers() {
      let mut server = mockito::Server::new_async().await;
      let download = server
        .mock("GET", "/assets/tool.artifactbundle.zip")
        .match_header("x-github-api-version", Matcher::Missing)
        .with_status(200)
        .with_body("bundle")
        .create_async()
        .await;

      let client = client_for(&server, None);
      let url = format!("{}/assets/tool.artifactbundle.zip", server.url());
      crate::util::hash::fetch_and_hash(client.http(), &url).await.unwrap();

      download.assert_async().await;
    }

    #[tokio::test]
    async fn non_success_status_is_registry_error() {
      let mut server = mockito::Server::new_async().await;
      let _mock = server
        .mock("GET", "/repos/acme/tool/releases/latest")
        .with_status(403)
        .with_body(r#"{"message":"API rate limit exceeded"}"#)
        .create_async()
        .await;

      let result = client_for(&server, None).latest_release(&repo()).await;
      assert!(matches!(result, Err(RegistryError::Status { status: 403, .. })));
    }

    #[tokio::test]
    async fn schema_mismatch_is_decode_error() {
      let mut server = mockito::Server::new_async().await;
      let _mock = server
        .mock("GET", "/repos/acme/tool/releases/latest")
        .with_status(200)
        .with_body(r#"{"id": 1, "assets": []}"#)
        .create_async()
        .await;

      let result = client_for(&server, None).latest_release(&repo()).await;
      assert!(matches!(result, Err(RegistryError::Decode { .. })));
    }
  }

  #[test]
  fn base_url_trailing_slash_is_trimmed() {
    let client = RegistryClient::new(&RegistryConfig {
      base_url: "https://ghe.example.com/api/v3/".to_string(),
      ..RegistryConfig::default()
    })
    .unwrap();

    assert_eq!(
      client.latest_release_url(&repo()),
      "https://ghe.example.com/api/v3/repos/acme/tool/releases/latest"
    );
  }

  #[test]
  fn debug_output_hides_token() {
    let config = RegistryConfig {
      token: Some("secret-token".to_string()),
      ..RegistryConfig::default()
    };
    assert!(!format!("{:?}", config).contains("secret-token"));
  }

  #[test]
  #[serial_test::serial]
  fn from_env_reads_registry_url() {
    temp_env::with_vars(
      [
        (REGISTRY_URL_ENV, Some("http://127.0.0.1:1234")),
        (crate::consts::TOKEN_ENV, Some("env-token")),
      ],
      || {
        let config = RegistryConfig::from_env();
        assert_eq!(config.base_url, "http://127.0.0.1:1234");
        assert_eq!(config.token.as_deref(), Some("env-token"));
      },
    );
  }
}
