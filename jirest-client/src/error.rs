//! Error types for the Jira client.

use std::path::PathBuf;

use jirest_core::ConfigError;
use thiserror::Error;

use crate::transport::TransportError;

/// Errors returned by [`JiraClient`](crate::JiraClient) operations.
///
/// [`JiraError::Unreachable`] is the expected-failure sentinel: the server
/// could not be contacted, the failure was already logged, and no response
/// exists.
#[derive(Debug, Error)]
pub enum JiraError {
  /// The server could not be reached (DNS, refused connection, timeout)
  #[error("Could not reach Jira at {url}: {source}")]
  Unreachable {
    url: String,
    #[source]
    source: TransportError,
  },

  /// The transport failed for a reason other than connectivity
  #[error("Request to {url} failed: {source}")]
  Transport {
    url: String,
    #[source]
    source: TransportError,
  },

  /// The response was flagged as an error by status or payload
  #[error("Jira returned HTTP {status}: {}", .messages.join("; "))]
  Api { status: u16, messages: Vec<String> },

  /// A successful response carried no JSON body where one was required
  #[error("Jira returned HTTP {status} without a JSON body")]
  MissingBody { status: u16 },

  /// The request path could not be turned into a URL
  #[error("Invalid request URL '{path}': {reason}")]
  InvalidUrl { path: String, reason: String },

  /// JSON did not match the expected record shape
  #[error("Failed to map JSON: {0}")]
  Decode(#[from] serde_json::Error),

  /// Local file access failed
  #[error("I/O error on {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error(transparent)]
  Config(#[from] ConfigError),
}

impl JiraError {
  /// Whether this is the connectivity sentinel
  pub const fn is_unreachable(&self) -> bool {
    matches!(self, JiraError::Unreachable { .. })
  }

  /// HTTP status for API errors
  pub const fn status(&self) -> Option<u16> {
    match self {
      JiraError::Api { status, .. } | JiraError::MissingBody { status } => Some(*status),
      _ => None,
    }
  }
}

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, JiraError>;
