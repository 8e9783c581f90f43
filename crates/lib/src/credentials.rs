//! Registry token lookup.
//!
//! The token comes from `GITHUB_TOKEN` when set, otherwise (macOS only) from the
//! login keychain entry for the `github.com` service. A missing token is not an
//! error: the registry is then queried anonymously.

use tracing::debug;

use crate::consts::TOKEN_ENV;

/// Find a bearer token for the registry, if one is configured.
pub fn github_token() -> Option<String> {
  token_from_env().or_else(token_from_keychain)
}

/// Read the token from the environment, ignoring empty values.
pub fn token_from_env() -> Option<String> {
  std::env::var(TOKEN_ENV)
    .ok()
    .map(|value| value.trim().to_string())
    .filter(|value| !value.is_empty())
}

#[cfg(target_os = "macos")]
fn token_from_keychain() -> Option<String> {
  use std::process::Command;

  use crate::consts::KEYCHAIN_SERVICE;

  let output = match Command::new("security")
    .args(["find-generic-password", "-s", KEYCHAIN_SERVICE, "-w"])
    .output()
  {
    Ok(output) => output,
    Err(e) => {
      debug!(error = %e, "failed to run keychain lookup");
      return None;
    }
  };

  if !output.status.success() {
    debug!(
      service = KEYCHAIN_SERVICE,
      status = ?output.status.code(),
      "no keychain entry for registry token"
    );
    return None;
  }

  let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
  if token.is_empty() { None } else { Some(token) }
}

#[cfg(not(target_os = "macos"))]
fn token_from_keychain() -> Option<String> {
  debug!("keychain lookup not supported on this platform");
  None
}
