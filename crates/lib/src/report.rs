//! The machine-readable run summary.
//!
//! The summary is a JSON object mapping each resolved target name to its
//! version, with keys in sorted order. It is the only thing written to the
//! output stream; everything else goes through [`Diagnostics`].

use std::collections::BTreeMap;
use std::io::{self, Write};

use thiserror::Error;

use crate::diagnostics::Diagnostics;
use crate::update::{BinaryDependency, UpdateOutcome};

#[derive(Debug, Error)]
pub enum ReportError {
  #[error("failed to serialize summary: {0}")]
  Serialize(#[source] serde_json::Error),

  #[error("failed to write summary: {0}")]
  Write(#[source] io::Error),
}

/// Map each dependency's name to its version string.
pub fn version_summary(dependencies: &[BinaryDependency]) -> BTreeMap<String, String> {
  dependencies
    .iter()
    .map(|dep| (dep.name.clone(), dep.version.to_string()))
    .collect()
}

/// Report a finished run.
///
/// Announces where the manifest was written (or that it was not) on
/// `diagnostics`, then writes the pretty-printed summary and a newline to
/// `out`.
pub fn report(outcome: &UpdateOutcome, out: &mut impl Write, diagnostics: &dyn Diagnostics) -> Result<(), ReportError> {
  if outcome.written {
    diagnostics.progress(&format!("Updated manifest file at {}", outcome.manifest_path.display()));
  } else {
    diagnostics.progress(&format!(
      "Dry run: manifest file at {} left unchanged",
      outcome.manifest_path.display()
    ));
  }

  let summary = version_summary(&outcome.dependencies);
  let mut rendered = serde_json::to_string_pretty(&summary).map_err(ReportError::Serialize)?;
  rendered.push('\n');

  out.write_all(rendered.as_bytes()).map_err(ReportError::Write)?;
  out.flush().map_err(ReportError::Write)
}
