//! Tracing subscriber setup for binaries.
//!
//! Library code only emits `tracing` events; binaries call [`init`] once to
//! decide where they go.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::Level;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

/// Pick the log level from the `-v` count, falling back to the configured
/// level name when no flag was given.
pub fn level_for(verbosity: u8, configured: Option<&str>) -> Level {
  match verbosity {
    0 => configured
      .and_then(|name| name.trim().parse::<Level>().ok())
      .unwrap_or(Level::WARN),
    1 => Level::INFO,
    2 => Level::DEBUG,
    _ => Level::TRACE,
  }
}

/// Install the global subscriber: an `fmt` layer on stderr, an optional
/// plain-text layer appending to `log_file`, filtered by `RUST_LOG` plus the
/// chosen level.
pub fn init(level: Level, log_file: Option<&Path>) -> Result<()> {
  let file_layer = match log_file {
    Some(path) => {
      let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {}", path.display()))?;
      Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
    }
    None => None,
  };

  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(file_layer)
    .with(EnvFilter::from_default_env().add_directive(level.into()))
    .try_init()
    .context("Failed to initialize tracing")?;

  tracing::debug!("Tracing initialized with level: {}", level);
  Ok(())
}
