//! # Command Line Interface
//!
//! Defines the CLI structure and dispatches subcommands. Raw access
//! (`request`, `upload`, `download`) sits next to a few typed lookups and
//! the configuration view.

mod config;
mod raw;
mod resources;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::builder::Styles;
use clap::builder::styling::AnsiColor;
use clap::{ArgAction, Parser, Subcommand};
use jirest_client::JiraClient;
use jirest_core::JiraConfig;
use tokio::runtime::Runtime;

use crate::output::ColorMode;

/// Top-level CLI command for jirest
#[derive(Parser)]
#[command(name = "jirest")]
#[command(about = "Talk to the Jira REST API from the command line")]
#[command(
  long_about = "jirest sends requests to a Jira instance and prints the JSON it returns.\n\n\
        The host and credentials come from jira.toml, JIRA_* environment variables\n\
        or ~/.netrc."
)]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(propagate_version = true)]
#[command(subcommand_required(true))]
#[command(disable_help_subcommand = true)]
#[command(max_term_width = 120)]
#[command(styles = Styles::styled()
    .header(AnsiColor::BrightBlue.on_default().bold().underline())
    .usage(AnsiColor::Blue.on_default().bold())
    .literal(AnsiColor::BrightBlue.on_default().bold())
    .placeholder(AnsiColor::BrightWhite.on_default().italic())
    .valid(AnsiColor::Green.on_default())
    .invalid(AnsiColor::BrightRed.on_default().bold())
)]
pub struct Cli {
  /// Sets the level of verbosity (can be used multiple times)
  #[arg(
    short = 'v',
    long = "verbose",
    action = ArgAction::Count,
    global = true,
    long_help = "Sets the level of verbosity for tracing and logging output.\n\n\
             -v: Show info level messages\n\
             -vv: Show debug level messages, including every request and response\n\
             -vvv: Show trace level messages"
  )]
  pub verbose: u8,

  /// Read configuration from this file instead of the default jira.toml
  #[arg(long, global = true, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Controls when colored output is used
  #[arg(long, value_enum, ignore_case = true, global = true, default_value_t = ColorMode::Auto)]
  pub colors: ColorMode,

  /// Subcommands
  #[command(subcommand)]
  pub command: Commands,
}

/// Subcommands for jirest
#[derive(Subcommand)]
pub enum Commands {
  /// Send a request to a REST resource
  #[command(long_about = "Send a request to a REST resource and print the response body.\n\n\
            The path is relative to {host}/rest/api/{version}/ unless it is a full URL.\n\
            For GET and HEAD the --data object becomes query parameters; for other verbs\n\
            it is sent as the JSON body.")]
  #[command(alias = "req")]
  Request(raw::RequestArgs),

  /// Upload files to a resource as multipart form data
  Upload(raw::UploadArgs),

  /// Download a resource to a file or stdout
  #[command(alias = "dl")]
  Download(raw::DownloadArgs),

  /// Show an issue
  Issue(resources::IssueArgs),

  /// List issue types
  #[command(name = "issue-types")]
  IssueTypes,

  /// List system and custom fields
  Fields(resources::FieldsArgs),

  /// Show the resolved configuration
  #[command(long_about = "Show the configuration jirest resolved from jira.toml, the environment\n\
            and ~/.netrc. Secrets are masked.")]
  Config(config::ConfigArgs),
}

/// Handle the parsed command.
///
/// `config` is shown even when it is incomplete; every other command needs a
/// valid host.
pub fn handle_cli(cli: Cli, config: JiraConfig) -> Result<()> {
  if let Commands::Config(args) = &cli.command {
    config::handle_config_command(&config, args)?;
    if !args.check {
      return Ok(());
    }
  }

  let (rt, client) = create_runtime_and_client(&config)?;

  rt.block_on(async {
    match cli.command {
      Commands::Request(args) => raw::handle_request_command(&client, &args).await,
      Commands::Upload(args) => raw::handle_upload_command(&client, &args).await,
      Commands::Download(args) => raw::handle_download_command(&client, &args).await,
      Commands::Issue(args) => resources::handle_issue_command(&client, &args).await,
      Commands::IssueTypes => resources::handle_issue_types_command(&client).await,
      Commands::Fields(args) => resources::handle_fields_command(&client, &args).await,
      Commands::Config(_) => config::handle_check_command(&client).await,
    }
  })
}

/// Creates a tokio runtime and a client for the configured instance
fn create_runtime_and_client(config: &JiraConfig) -> Result<(Runtime, JiraClient)> {
  let rt = Runtime::new().context("Failed to create async runtime")?;
  let client = JiraClient::new(config).context("Failed to create Jira client")?;
  Ok((rt, client))
}
