//! # Credential Lookup
//!
//! Credentials for the Jira host are normally part of the configuration. When
//! they are not, they are looked up in the user's `.netrc` file.

pub mod netrc;

/// Represents credentials for a service
#[derive(Clone)]
pub struct Credentials {
  pub username: String,
  pub password: String,
}

impl std::fmt::Debug for Credentials {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Credentials")
      .field("username", &self.username)
      .field("password", &"<redacted>")
      .finish()
  }
}
