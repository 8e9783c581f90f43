//! CLI output formatting.
//!
//! Everything here writes to stderr; stdout is reserved for the JSON summary.

use owo_colors::{OwoColorize, Stream};

use bundlebump_lib::diagnostics::Diagnostics;

pub mod symbols {
  pub const ERROR: &str = "✗";
  pub const INFO: &str = "•";
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_info(message: &str) {
  eprintln!(
    "{} {}",
    symbols::INFO.if_supports_color(Stream::Stderr, |s| s.blue()),
    message
  );
}

/// Prints progress lines to stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrDiagnostics;

impl Diagnostics for StderrDiagnostics {
  fn progress(&self, message: &str) {
    print_info(message);
  }
}
