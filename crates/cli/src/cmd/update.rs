//! Implementation of the `bundlebump` update run.
//!
//! Resolves the latest release of every binary target in the package
//! manifest, rewrites the manifest and prints the version summary.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};

use bundlebump_lib::diagnostics::{Diagnostics, TracingDiagnostics};
use bundlebump_lib::registry::RegistryConfig;
use bundlebump_lib::report::report;
use bundlebump_lib::update::{UpdateOptions, update_package};

use crate::output::StderrDiagnostics;

/// Arguments of an update run.
#[derive(Debug)]
pub struct UpdateArgs {
  pub package_path: PathBuf,
  pub update_target: Option<String>,
  pub registry_url: Option<String>,
  pub timeout: u64,
  pub dry_run: bool,
  /// Route progress through `tracing` instead of printing it.
  pub quiet: bool,
}

/// Execute the update run.
///
/// # Errors
///
/// Returns an error if the manifest cannot be loaded or written, or if any
/// binary target fails to resolve. The manifest is unchanged in that case.
pub fn cmd_update(args: UpdateArgs) -> Result<()> {
  let mut config = RegistryConfig::from_env();
  if let Some(url) = args.registry_url {
    config.base_url = url;
  }
  config.timeout = Duration::from_secs(args.timeout);

  let options = UpdateOptions {
    target: args.update_target,
    dry_run: args.dry_run,
  };

  let diagnostics: Arc<dyn Diagnostics> = if args.quiet {
    Arc::new(TracingDiagnostics)
  } else {
    Arc::new(StderrDiagnostics)
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let outcome = rt
    .block_on(update_package(&args.package_path, &options, &config, diagnostics.clone()))
    .with_context(|| format!("Failed to update package at {}", args.package_path.display()))?;

  let stdout = io::stdout();
  report(&outcome, &mut stdout.lock(), diagnostics.as_ref()).context("Failed to print summary")?;

  Ok(())
}
