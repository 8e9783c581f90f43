mod cmd;
mod output;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use bundlebump_lib::consts::{DEFAULT_TIMEOUT_SECS, REGISTRY_URL_ENV};

use crate::cmd::UpdateArgs;
use crate::output::print_error;

/// Update the binary targets of a package manifest to their latest releases.
///
/// Prints a JSON object of target name to version on stdout. Progress and
/// errors go to stderr.
#[derive(Parser)]
#[command(name = "bundlebump", author, version, about, long_about = None)]
struct Cli {
  /// Package directory containing manifest.json
  package_path: PathBuf,

  /// Only update the binary target with this name
  #[arg(long, value_name = "NAME")]
  update_target: Option<String>,

  /// Release registry API root
  #[arg(long, value_name = "URL", env = REGISTRY_URL_ENV)]
  registry_url: Option<String>,

  /// Per-request timeout in seconds
  #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
  timeout: u64,

  /// Resolve and report without writing the manifest
  #[arg(long)]
  dry_run: bool,

  /// Send progress messages to the log instead of stderr
  #[arg(short, long)]
  quiet: bool,

  /// Enable verbose output
  #[arg(short, long)]
  verbose: bool,
}

fn main() -> ExitCode {
  let cli = Cli::parse();

  let default_level = if cli.verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  let args = UpdateArgs {
    package_path: cli.package_path,
    update_target: cli.update_target,
    registry_url: cli.registry_url,
    timeout: cli.timeout,
    dry_run: cli.dry_run,
    quiet: cli.quiet,
  };

  match cmd::cmd_update(args) {
    Ok(()) => ExitCode::SUCCESS,
    Err(err) => {
      print_error(&format!("{:#}", err));
      ExitCode::FAILURE
    }
  }
}
