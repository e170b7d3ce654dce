//! # jirest CLI Entry Point
//!
//! Parses arguments, resolves the Jira configuration, installs logging and
//! runs the chosen subcommand.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use directories::BaseDirs;
use jirest_core::{JiraConfig, logging};

mod cli;
mod output;

fn main() -> ExitCode {
  let cmd = cli::Cli::parse();
  cmd.colors.apply();

  match run(cmd) {
    Ok(()) => ExitCode::SUCCESS,
    Err(e) => {
      output::print_error(&format!("{e:#}"));
      ExitCode::FAILURE
    }
  }
}

fn run(cmd: cli::Cli) -> Result<()> {
  let base_dirs = BaseDirs::new();
  let home = base_dirs.as_ref().map(BaseDirs::home_dir);

  // Resolve configuration first so its log level and file apply, but report
  // a failure only once logging is up. Validation is left to the commands.
  let config = JiraConfig::resolve(cmd.config.as_deref(), home);
  let (configured_level, log_file) = match &config {
    Ok(config) => (config.log_level.as_deref(), config.log_file.as_deref()),
    Err(_) => (None, None),
  };

  let level = logging::level_for(cmd.verbose, configured_level);
  logging::init(level, log_file)?;

  let config = config?;
  cli::handle_cli(cmd, config)
}
