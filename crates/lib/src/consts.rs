//! Shared constants.

/// Canonical manifest file name inside a package directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Suffix identifying the distributable archive attached to a release.
pub const ARTIFACT_BUNDLE_SUFFIX: &str = ".artifactbundle.zip";

pub const DEFAULT_REGISTRY_URL: &str = "https://api.github.com";

/// Overrides the registry base URL (GitHub Enterprise, local mocks).
pub const REGISTRY_URL_ENV: &str = "BUNDLEBUMP_REGISTRY_URL";

pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Keychain service holding the registry token on macOS.
pub const KEYCHAIN_SERVICE: &str = "github.com";

pub const REGISTRY_API_VERSION: &str = "2022-11-28";

pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

pub const USER_AGENT: &str = concat!("bundlebump/", env!("CARGO_PKG_VERSION"));
