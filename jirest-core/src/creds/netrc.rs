//! Helpers for reading credentials stored in `.netrc` files.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::consts::ATLASSIAN_CLOUD_MACHINE;
use crate::creds::Credentials;
use crate::url::machine_name;

/// Returns the path to the `.netrc` file for the provided home directory.
///
/// ```
/// use std::path::Path;
/// use jirest_core::creds::netrc::get_netrc_path;
///
/// let path = get_netrc_path(Path::new("/home/user"));
/// assert_eq!(path, Path::new("/home/user/.netrc"));
/// ```
pub fn get_netrc_path(home: &Path) -> PathBuf {
  home.join(".netrc")
}

fn complete_entry(
  target_machine: &str,
  machine: Option<&str>,
  username: Option<&str>,
  password: Option<&str>,
) -> Option<Credentials> {
  match (machine, username, password) {
    (Some(machine), Some(username), Some(password)) if machine == target_machine => Some(Credentials {
      username: username.to_string(),
      password: password.to_string(),
    }),
    _ => None,
  }
}

/// Parses `.netrc` content and returns credentials for the requested machine.
///
/// Tokens are read as a flat stream, so both the single-line
/// (`machine host login user password pass`) and multi-line layouts work.
/// Entries missing either `login` or `password` are ignored.
pub fn parse_netrc(content: &str, target_machine: &str) -> Option<Credentials> {
  let mut tokens = content.split_whitespace();
  let mut current_machine: Option<&str> = None;
  let mut username: Option<&str> = None;
  let mut password: Option<&str> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" | "default" => {
        if let Some(creds) = complete_entry(target_machine, current_machine, username, password) {
          return Some(creds);
        }
        current_machine = if token == "machine" { tokens.next() } else { None };
        username = None;
        password = None;
      }
      "login" => username = tokens.next(),
      "password" => password = tokens.next(),
      _ => {}
    }
  }

  complete_entry(target_machine, current_machine, username, password)
}

/// Reads a `.netrc` file and returns credentials for the requested machine.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn parse_netrc_file(path: &Path, target_machine: &str) -> Result<Option<Credentials>> {
  let content = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
  Ok(parse_netrc(&content, target_machine))
}

/// Looks up credentials for a Jira host in `<home>/.netrc`.
///
/// The host's machine name is tried first, then the shared
/// `atlassian.net` entry. A missing `.netrc` yields `Ok(None)`.
pub fn lookup_credentials(home: &Path, host: &str) -> Result<Option<Credentials>> {
  let path = get_netrc_path(home);
  if !path.exists() {
    debug!(path = %path.display(), "No .netrc file found");
    return Ok(None);
  }

  let machine = machine_name(host);
  for candidate in [machine.as_str(), ATLASSIAN_CLOUD_MACHINE] {
    if let Some(creds) = parse_netrc_file(&path, candidate)? {
      debug!(machine = candidate, "Found credentials in .netrc");
      return Ok(Some(creds));
    }
  }

  Ok(None)
}
