//! Host URL normalization.
//!
//! Users configure the Jira host in many shapes (`company.atlassian.net`,
//! `https://jira.example.com/`, `http:/localhost:8080`). Everything downstream
//! expects `scheme://host[:port][/context-path]` with no trailing slash.

use url::{Position, Url};

use crate::config::ConfigError;

/// Render a parsed URL without a trailing `/`, query or fragment.
fn render_base(url: &Url) -> String {
  let mut result = url[..Position::BeforePath].to_string();
  let path = url.path().trim_end_matches('/');
  result.push_str(path);
  result
}

/// Parse a host by forcing the `https://` scheme, tolerating malformed
/// `http:/host` style prefixes.
fn parse_with_https_prefix(input: &str) -> Result<Url, ConfigError> {
  let mut candidate = input;

  if let Some(colon_index) = input.find(':') {
    let potential_scheme = &input[..colon_index];
    if ["http", "https"]
      .iter()
      .any(|scheme| potential_scheme.eq_ignore_ascii_case(scheme))
    {
      let remainder = input[colon_index + 1..].trim_start_matches('/');
      if !remainder.is_empty() {
        candidate = remainder;
      }
    }
  }

  Url::parse(&format!("https://{candidate}")).map_err(|err| ConfigError::InvalidHost {
    host: input.to_string(),
    reason: err.to_string(),
  })
}

/// Normalize a configured Jira host into a base URL.
///
/// Hosts without a scheme get `https://`. Only `http` and `https` are
/// accepted. Query strings and fragments are dropped, as is any trailing
/// slash on the context path.
pub fn normalize_host_url(input: &str) -> Result<String, ConfigError> {
  let trimmed = input.trim();
  if trimmed.is_empty() {
    return Err(ConfigError::MissingHost);
  }

  let lowered = trimmed.to_ascii_lowercase();
  let malformed_scheme = (lowered.starts_with("http:") && !lowered.starts_with("http://"))
    || (lowered.starts_with("https:") && !lowered.starts_with("https://"));

  let url = if malformed_scheme {
    parse_with_https_prefix(trimmed)?
  } else {
    match Url::parse(trimmed) {
      Ok(url) if url.host().is_some() => url,
      _ => parse_with_https_prefix(trimmed)?,
    }
  };

  if !matches!(url.scheme(), "http" | "https") {
    return Err(ConfigError::InvalidHost {
      host: input.to_string(),
      reason: format!("unsupported scheme '{}'", url.scheme()),
    });
  }

  Ok(render_base(&url))
}

/// Strip the scheme and trailing slash from a host, leaving the machine name
/// used for `.netrc` lookups.
pub fn machine_name(host: &str) -> String {
  let without_scheme = host
    .trim()
    .trim_start_matches("https://")
    .trim_start_matches("http://");
  let end = without_scheme
    .find(['/', ':'])
    .unwrap_or(without_scheme.len());
  without_scheme[..end].to_string()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_normalize_with_https() {
    let result = normalize_host_url("https://company.atlassian.net").unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_normalize_with_http_and_port() {
    let result = normalize_host_url("http://localhost:8080").unwrap();
    assert_eq!(result, "http://localhost:8080");
  }

  #[test]
  fn test_normalize_without_scheme() {
    let result = normalize_host_url("company.atlassian.net").unwrap();
    assert_eq!(result, "https://company.atlassian.net");
  }

  #[test]
  fn test_normalize_strips_trailing_slashes() {
    let result = normalize_host_url("https://jira.example.com/jira///").unwrap();
    assert_eq!(result, "https://jira.example.com/jira");
  }

  #[test]
  fn test_normalize_drops_query_and_fragment() {
    let result = normalize_host_url("jira.example.com/?foo=bar#top").unwrap();
    assert_eq!(result, "https://jira.example.com");
  }

  #[test]
  fn test_normalize_ip_with_port() {
    let result = normalize_host_url("192.168.1.100:8080").unwrap();
    assert_eq!(result, "https://192.168.1.100:8080");
  }

  #[test]
  fn test_normalize_uppercase_scheme() {
    let result = normalize_host_url("HTTP://example.com").unwrap();
    assert_eq!(result, "http://example.com");
  }

  #[test]
  fn test_normalize_partial_scheme() {
    let result = normalize_host_url("http:/example.com").unwrap();
    assert_eq!(result, "https://example.com");
  }

  #[test]
  fn test_normalize_empty_host() {
    let result = normalize_host_url("   ");
    assert!(matches!(result, Err(ConfigError::MissingHost)));
  }

  #[test]
  fn test_normalize_rejects_other_schemes() {
    let err = normalize_host_url("ftp://example.com").unwrap_err();
    assert!(err.to_string().contains("unsupported scheme 'ftp'"));
  }

  #[test]
  fn test_machine_name() {
    assert_eq!(machine_name("https://company.atlassian.net/"), "company.atlassian.net");
    assert_eq!(machine_name("http://localhost:8080/jira"), "localhost");
    assert_eq!(machine_name("jira.example.com"), "jira.example.com");
  }
}
