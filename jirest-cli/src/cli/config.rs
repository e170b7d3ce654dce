//! # Config Command
//!
//! Shows the resolved configuration and optionally checks that the instance
//! answers with the configured credentials.

use anyhow::{Result, bail};
use clap::Args;
use jirest_client::JiraClient;
use jirest_core::{JiraAuth, JiraConfig};

use crate::output::{print_error, print_json, print_row, print_success, print_warning};

/// Arguments for `config`
#[derive(Args)]
pub struct ConfigArgs {
  /// Print the configuration as JSON
  #[arg(long)]
  pub json: bool,

  /// Also test the connection
  #[arg(long)]
  pub check: bool,
}

/// Print the configuration, normalized when it is valid
pub(super) fn handle_config_command(config: &JiraConfig, args: &ConfigArgs) -> Result<()> {
  let mut shown = config.redacted();
  if let Err(e) = shown.validate() {
    print_warning(&format!("Configuration is incomplete: {e}"));
  }

  if args.json {
    print_json(&serde_json::to_value(&shown)?)?;
  } else {
    for (label, value) in config_rows(&shown) {
      print_row(label, &value);
    }
  }
  Ok(())
}

pub(super) async fn handle_check_command(client: &JiraClient) -> Result<()> {
  if client.test_connection().await? {
    print_success(&format!("Connected to {}", client.host()));
    Ok(())
  } else {
    print_error(&format!("Could not authenticate against {}", client.host()));
    bail!("Connection check failed")
  }
}

fn config_rows(config: &JiraConfig) -> Vec<(&'static str, String)> {
  let auth = match config.auth() {
    JiraAuth::Basic { username, .. } => format!("basic ({username})"),
    JiraAuth::Bearer { .. } => "personal access token".to_string(),
    JiraAuth::Anonymous => "anonymous".to_string(),
  };

  if config.host.trim().is_empty() {
    return vec![("Host", "<not set>".to_string()), ("Auth", auth)];
  }

  let mut rows = vec![
    ("Host", config.host.clone()),
    ("API root", config.api_root()),
    ("Auth", auth),
    ("Timeout", format!("{}s", config.timeout_secs)),
    ("Verify TLS", config.verify_tls.to_string()),
  ];
  if let Some(proxy) = &config.proxy {
    rows.push(("Proxy", proxy.url.clone()));
  }
  if let Some(log_file) = &config.log_file {
    rows.push(("Log file", log_file.display().to_string()));
  }
  rows
}
