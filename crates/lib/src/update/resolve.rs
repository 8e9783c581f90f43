//! Concurrent resolution of all binary targets.
//!
//! One task is spawned per eligible target with no concurrency cap. The first
//! failure aborts the remaining tasks and becomes the run's error; results are
//! only returned once every task succeeded.

use std::sync::Arc;

use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use super::UpdateError;
use super::task::{BinaryDependency, BinaryTarget, resolve_dependency};
use crate::diagnostics::Diagnostics;
use crate::manifest::Target;
use crate::registry::RegistryClient;

/// Pick the binary targets to update.
///
/// Binary targets without a URL cannot be resolved and are skipped. With a
/// `filter`, only the target of that name is kept; a filter that matches
/// nothing yields an empty list.
pub fn discover_targets(targets: &[Target], filter: Option<&str>) -> Vec<BinaryTarget> {
  targets
    .iter()
    .filter(|target| target.is_binary())
    .filter(|target| filter.is_none_or(|name| target.name == name))
    .filter_map(|target| match &target.url {
      Some(url) => Some(BinaryTarget {
        name: target.name.clone(),
        source_url: url.clone(),
      }),
      None => {
        warn!(name = %target.name, "binary target has no url, skipping");
        None
      }
    })
    .collect()
}

/// Resolve the binary targets of `targets` concurrently.
///
/// Returns the resolved dependencies sorted by name, independent of the order
/// in which tasks finished.
///
/// # Errors
///
/// Returns [`UpdateError::Dependency`] for the first target that fails. All
/// other in-flight tasks are aborted and their results discarded.
pub async fn resolve_binary_dependencies(
  client: &RegistryClient,
  targets: &[Target],
  filter: Option<&str>,
  diagnostics: Arc<dyn Diagnostics>,
) -> Result<Vec<BinaryDependency>, UpdateError> {
  let candidates = discover_targets(targets, filter);
  info!(count = candidates.len(), filter = ?filter, "resolving binary targets");

  let mut join_set = JoinSet::new();

  for target in candidates {
    let client = client.clone();
    let diagnostics = Arc::clone(&diagnostics);

    join_set.spawn(async move {
      let result = resolve_dependency(&client, &target, diagnostics.as_ref()).await;
      (target.name, result)
    });
  }

  let mut resolved = Vec::with_capacity(join_set.len());

  while let Some(join_result) = join_set.join_next().await {
    match join_result {
      Ok((name, Ok(dependency))) => {
        debug!(name = %name, version = %dependency.version, "binary target resolved");
        resolved.push(dependency);
      }
      Ok((name, Err(source))) => {
        error!(name = %name, stage = %source.stage(), error = %source, "binary target failed");
        join_set.abort_all();
        return Err(UpdateError::Dependency {
          stage: source.stage(),
          name,
          source,
        });
      }
      Err(e) => {
        error!(error = %e, "resolution task panicked");
        join_set.abort_all();
        return Err(UpdateError::TaskPanicked(e.to_string()));
      }
    }
  }

  resolved.sort_by(|a, b| a.name.cmp(&b.name));
  Ok(resolved)
}
