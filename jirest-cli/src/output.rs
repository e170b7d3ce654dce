//! # Output Formatting
//!
//! Colored status lines for people and pretty JSON for pipes. Status lines go
//! to stderr so stdout stays machine readable.

use anyhow::Result;
use owo_colors::{OwoColorize, Stream};
use serde_json::Value;

/// When to use colored output
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorMode {
  /// Color when the stream is a terminal
  Auto,
  Always,
  Never,
}

impl ColorMode {
  pub fn apply(self) {
    match self {
      ColorMode::Auto => owo_colors::unset_override(),
      ColorMode::Always => owo_colors::set_override(true),
      ColorMode::Never => owo_colors::set_override(false),
    }
  }
}

/// Print a success message
pub fn print_success(message: &str) {
  eprintln!(
    "{} {}",
    "✓".if_supports_color(Stream::Stderr, |s| s.green().bold().to_string()),
    message
  );
}

/// Print an error message
pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    "✗".if_supports_color(Stream::Stderr, |s| s.red().bold().to_string()),
    message
  );
}

/// Print a warning message
pub fn print_warning(message: &str) {
  eprintln!(
    "{} {}",
    "⚠".if_supports_color(Stream::Stderr, |s| s.yellow().bold().to_string()),
    message
  );
}

/// Print an info message
pub fn print_info(message: &str) {
  eprintln!(
    "{} {}",
    "ℹ".if_supports_color(Stream::Stderr, |s| s.blue().bold().to_string()),
    message
  );
}

/// Print one `label  value` row on stdout
pub fn print_row(label: &str, value: &str) {
  let label = format!("{label:<24}");
  println!(
    "{} {}",
    label.if_supports_color(Stream::Stdout, |s| s.bright_cyan().to_string()),
    value
  );
}

/// Print a JSON value, indented, on stdout
pub fn print_json(value: &Value) -> Result<()> {
  println!("{}", format_json(value)?);
  Ok(())
}

pub fn format_json(value: &Value) -> Result<String> {
  Ok(serde_json::to_string_pretty(value)?)
}

/// Format an HTTP status for display
pub fn format_status(status: u16) -> String {
  let text = status.to_string();
  match status {
    200..=299 => text.if_supports_color(Stream::Stderr, |s| s.green().to_string()).to_string(),
    400..=599 => text.if_supports_color(Stream::Stderr, |s| s.red().to_string()).to_string(),
    _ => text.if_supports_color(Stream::Stderr, |s| s.yellow().to_string()).to_string(),
  }
}

#[cfg(test)]
mod tests {
  use insta::assert_snapshot;
  use serde_json::json;

  use super::*;

  #[test]
  fn test_format_json() {
    let rendered = format_json(&json!({ "key": "PROJ-1", "fields": { "summary": "Crash" } })).unwrap();
    assert_snapshot!(rendered, @r#"
    {
      "fields": {
        "summary": "Crash"
      },
      "key": "PROJ-1"
    }
    "#);
  }

  #[test]
  fn test_format_status_without_colors() {
    ColorMode::Never.apply();
    assert_eq!(format_status(204), "204");
    assert_eq!(format_status(404), "404");
    ColorMode::Auto.apply();
  }
}
