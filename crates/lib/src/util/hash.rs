//! Content hashing for release assets.
//!
//! The checksum written into the manifest is the lowercase hex SHA-256 of the
//! asset bytes exactly as served from its download URL. Consumers recompute
//! the same digest when they fetch the artifact, so it must cover the whole
//! body and nothing else.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::debug;

/// A full 64-character SHA-256 hash, lowercase hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl std::fmt::Display for ContentHash {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Errors that can occur while downloading an asset for hashing.
#[derive(Debug, Error)]
pub enum FetchError {
  /// The request could not be sent.
  #[error("failed to download {url}: {source}")]
  Request {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  /// The server answered with a non-success status.
  #[error("download of {url} returned HTTP {status}")]
  Status { url: String, status: u16 },

  /// The connection failed while streaming the body.
  #[error("failed to read body of {url}: {source}")]
  Read {
    url: String,
    #[source]
    source: reqwest::Error,
  },
}

/// Hash arbitrary bytes.
pub fn hash_bytes(data: &[u8]) -> ContentHash {
  let mut hasher = Sha256::new();
  hasher.update(data);
  ContentHash(hex::encode(hasher.finalize()))
}

/// Download `url` and hash its body.
///
/// The body is streamed through the hasher chunk by chunk, so large bundles are
/// never buffered in full.
pub async fn fetch_and_hash(client: &Client, url: &str) -> Result<ContentHash, FetchError> {
  let mut response = client.get(url).send().await.map_err(|source| FetchError::Request {
    url: url.to_string(),
    source,
  })?;

  let status = response.status();
  if !status.is_success() {
    return Err(FetchError::Status {
      url: url.to_string(),
      status: status.as_u16(),
    });
  }

  let mut hasher = Sha256::new();
  let mut size = 0usize;

  while let Some(chunk) = response.chunk().await.map_err(|source| FetchError::Read {
    url: url.to_string(),
    source,
  })? {
    size += chunk.len();
    hasher.update(&chunk);
  }

  let hash = ContentHash(hex::encode(hasher.finalize()));
  debug!(url, size, hash = %hash, "hashed asset");
  Ok(hash)
}
