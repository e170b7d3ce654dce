//! # jirest Core Library
//!
//! Shared plumbing for the jirest crates: the client configuration and where
//! it is loaded from, `.netrc` credential lookup, host URL normalization, and
//! tracing subscriber setup for binaries.

pub mod config;
pub mod consts;
pub mod creds;
pub mod logging;
pub mod url;

// Re-export main types
pub use config::{ConfigDirs, ConfigError, JiraAuth, JiraConfig, ProxyConfig};
pub use creds::Credentials;
