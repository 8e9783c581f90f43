//! Human-readable progress output.
//!
//! Progress messages are routed through a [`Diagnostics`] sink handed to the
//! pipeline by its caller, keeping stdout free for the machine-readable summary.

use std::sync::Mutex;

use tracing::info;

/// Receives progress messages from the update pipeline.
///
/// Implementations must be shareable across concurrently running tasks.
pub trait Diagnostics: Send + Sync {
  /// Report a single progress line.
  fn progress(&self, message: &str);
}

/// Forwards progress lines to `tracing` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl Diagnostics for TracingDiagnostics {
  fn progress(&self, message: &str) {
    info!("{}", message);
  }
}

/// Keeps every progress line in memory.
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
  messages: Mutex<Vec<String>>,
}

impl RecordingDiagnostics {
  pub fn new() -> Self {
    Self::default()
  }

  /// Messages received so far, in arrival order.
  pub fn messages(&self) -> Vec<String> {
    match self.messages.lock() {
      Ok(messages) => messages.clone(),
      Err(poisoned) => poisoned.into_inner().clone(),
    }
  }
}

impl Diagnostics for RecordingDiagnostics {
  fn progress(&self, message: &str) {
    let mut messages = match self.messages.lock() {
      Ok(messages) => messages,
      Err(poisoned) => poisoned.into_inner(),
    };
    messages.push(message.to_string());
  }
}
