//! # Configuration Management
//!
//! The client is configured by a [`JiraConfig`] assembled from defaults, a
//! `jira.toml` file, `JIRA_*` environment variables and, when no credentials
//! were given, the user's `.netrc`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::consts::{
  CONFIG_FILE_NAME, DEFAULT_API_VERSION, DEFAULT_TIMEOUT_SECS, ENV_JIRA_HOST, ENV_JIRA_PASS, ENV_JIRA_PAT,
  ENV_JIRA_REST_API_V3, ENV_JIRA_TIMEOUT, ENV_JIRA_USER, USER_AGENT,
};
use crate::creds::netrc::lookup_credentials;
use crate::url::normalize_host_url;

const REDACTED: &str = "********";

/// Problems with a configuration's values
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
  #[error("Jira host is not configured (set `host` in jira.toml or $JIRA_HOST)")]
  MissingHost,

  #[error("Invalid Jira host '{host}': {reason}")]
  InvalidHost { host: String, reason: String },

  #[error("Unsupported REST API version {0}; expected 2 or 3")]
  UnsupportedApiVersion(u8),

  #[error("Invalid value '{value}' for {key}")]
  InvalidValue { key: String, value: String },
}

/// How requests are authenticated
#[derive(Clone, PartialEq, Eq)]
pub enum JiraAuth {
  /// HTTP Basic with a username and a password or API token
  Basic { username: String, password: String },
  /// Bearer personal access token
  Bearer { token: String },
  /// No credentials
  Anonymous,
}

impl std::fmt::Debug for JiraAuth {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      JiraAuth::Basic { username, .. } => f
        .debug_struct("Basic")
        .field("username", username)
        .field("password", &REDACTED)
        .finish(),
      JiraAuth::Bearer { .. } => f.debug_struct("Bearer").field("token", &REDACTED).finish(),
      JiraAuth::Anonymous => f.write_str("Anonymous"),
    }
  }
}

/// Outbound proxy settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProxyConfig {
  pub url: String,
  pub username: Option<String>,
  pub password: Option<String>,
}

/// Settings for talking to one Jira instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiraConfig {
  /// Base URL of the instance, e.g. `https://company.atlassian.net`
  pub host: String,
  /// REST API version, 2 or 3
  pub api_version: u8,
  pub username: Option<String>,
  /// Password or API token for Basic auth
  pub password: Option<String>,
  /// Personal access token; takes precedence over Basic credentials
  pub personal_access_token: Option<String>,
  pub timeout_secs: u64,
  /// Verify TLS certificates
  pub verify_tls: bool,
  pub user_agent: String,
  /// Default log level for binaries (`error`, `warn`, `info`, `debug`, `trace`)
  pub log_level: Option<String>,
  /// Append logs to this file in addition to stderr
  pub log_file: Option<PathBuf>,
  pub proxy: Option<ProxyConfig>,
}

impl Default for JiraConfig {
  fn default() -> Self {
    Self {
      host: String::new(),
      api_version: DEFAULT_API_VERSION,
      username: None,
      password: None,
      personal_access_token: None,
      timeout_secs: DEFAULT_TIMEOUT_SECS,
      verify_tls: true,
      user_agent: USER_AGENT.to_string(),
      log_level: None,
      log_file: None,
      proxy: None,
    }
  }
}

impl JiraConfig {
  /// Create a configuration for a host with Basic credentials
  pub fn new(host: &str, username: &str, password: &str) -> Self {
    Self {
      host: host.to_string(),
      username: Some(username.to_string()),
      password: Some(password.to_string()),
      ..Default::default()
    }
  }

  /// Read a configuration from a TOML file
  pub fn from_file(path: &Path) -> Result<Self> {
    let content =
      fs::read_to_string(path).with_context(|| format!("Failed to read Jira config from {}", path.display()))?;

    toml::from_str(&content).with_context(|| format!("Failed to parse Jira config from {}", path.display()))
  }

  /// Override values from the process environment
  pub fn apply_env(&mut self) -> Result<(), ConfigError> {
    self.apply_env_with(|key| std::env::var(key).ok())
  }

  /// Override values from `JIRA_*` variables provided by `lookup`
  pub fn apply_env_with<F>(&mut self, lookup: F) -> Result<(), ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let value_of = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(host) = value_of(ENV_JIRA_HOST) {
      self.host = host;
    }
    if let Some(username) = value_of(ENV_JIRA_USER) {
      self.username = Some(username);
    }
    if let Some(password) = value_of(ENV_JIRA_PASS) {
      self.password = Some(password);
    }
    if let Some(token) = value_of(ENV_JIRA_PAT) {
      self.personal_access_token = Some(token);
    }
    if let Some(flag) = value_of(ENV_JIRA_REST_API_V3) {
      self.api_version = match flag.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => 3,
        "0" | "false" | "no" | "off" => 2,
        _ => {
          return Err(ConfigError::InvalidValue {
            key: ENV_JIRA_REST_API_V3.to_string(),
            value: flag,
          });
        }
      };
    }
    if let Some(timeout) = value_of(ENV_JIRA_TIMEOUT) {
      self.timeout_secs = timeout.trim().parse().map_err(|_parse_err| ConfigError::InvalidValue {
        key: ENV_JIRA_TIMEOUT.to_string(),
        value: timeout.clone(),
      })?;
    }

    Ok(())
  }

  /// Whether any credentials are configured
  pub fn has_credentials(&self) -> bool {
    self.personal_access_token.is_some() || (self.username.is_some() && self.password.is_some())
  }

  /// Fill Basic credentials from `<home>/.netrc` when none are configured.
  ///
  /// Returns `true` when credentials were found.
  pub fn fill_credentials_from_netrc(&mut self, home: &Path) -> Result<bool> {
    if self.has_credentials() || self.host.trim().is_empty() {
      return Ok(false);
    }

    match lookup_credentials(home, &self.host)? {
      Some(creds) => {
        self.username = Some(creds.username);
        self.password = Some(creds.password);
        Ok(true)
      }
      None => Ok(false),
    }
  }

  /// Normalize the host and check value ranges
  pub fn validate(&mut self) -> Result<(), ConfigError> {
    self.host = normalize_host_url(&self.host)?;

    if !matches!(self.api_version, 2 | 3) {
      return Err(ConfigError::UnsupportedApiVersion(self.api_version));
    }

    Ok(())
  }

  /// The credentials requests are sent with
  pub fn auth(&self) -> JiraAuth {
    if let Some(token) = &self.personal_access_token {
      return JiraAuth::Bearer { token: token.clone() };
    }

    match (&self.username, &self.password) {
      (Some(username), Some(password)) => JiraAuth::Basic {
        username: username.clone(),
        password: password.clone(),
      },
      _ => JiraAuth::Anonymous,
    }
  }

  /// Root URL every relative resource path is resolved against
  pub fn api_root(&self) -> String {
    format!("{}/rest/api/{}/", self.host.trim_end_matches('/'), self.api_version)
  }

  /// A copy safe to print, with secrets masked
  pub fn redacted(&self) -> Self {
    let mask = |secret: &Option<String>| secret.as_ref().map(|_| REDACTED.to_string());

    Self {
      password: mask(&self.password),
      personal_access_token: mask(&self.personal_access_token),
      proxy: self.proxy.as_ref().map(|proxy| ProxyConfig {
        password: mask(&proxy.password),
        ..proxy.clone()
      }),
      ..self.clone()
    }
  }

  /// Resolve the effective configuration and validate it
  pub fn load(file: Option<&Path>, home: Option<&Path>) -> Result<Self> {
    let mut config = Self::resolve(file, home)?;
    config.validate()?;
    debug!(host = %config.host, api_version = config.api_version, auth = ?config.auth(), "Resolved Jira configuration");
    Ok(config)
  }

  /// Resolve the configuration without validating it.
  ///
  /// Reads `file` (or `jira.toml` in the config directory when it exists),
  /// applies environment overrides, then fills credentials from `.netrc`
  /// under `home`. The host may still be missing or unnormalized.
  pub fn resolve(file: Option<&Path>, home: Option<&Path>) -> Result<Self> {
    let mut config = match file {
      Some(path) => Self::from_file(path)?,
      None => {
        let default_path = get_config_dirs()?.jira_config_path();
        if default_path.exists() {
          Self::from_file(&default_path)?
        } else {
          debug!(path = %default_path.display(), "No config file, using defaults");
          Self::default()
        }
      }
    };

    config.apply_env()?;

    if let Some(home) = home {
      config.fill_credentials_from_netrc(home)?;
    }

    Ok(config)
  }
}

/// Represents the configuration directories for jirest
#[derive(Debug, Clone)]
pub struct ConfigDirs {
  pub config_dir: PathBuf,
}

impl ConfigDirs {
  /// Create a new ConfigDirs instance
  pub fn new() -> Result<Self> {
    let proj_dirs = ProjectDirs::from("", "", "jirest").context("Failed to determine project directories")?;

    Ok(Self {
      config_dir: proj_dirs.config_dir().to_path_buf(),
    })
  }

  /// Get the config directory
  pub fn config_dir(&self) -> &PathBuf {
    &self.config_dir
  }

  /// Get the path to the Jira configuration file
  pub fn jira_config_path(&self) -> PathBuf {
    self.config_dir.join(CONFIG_FILE_NAME)
  }
}

/// Get the configuration directories
pub fn get_config_dirs() -> Result<ConfigDirs> {
  ConfigDirs::new()
}
