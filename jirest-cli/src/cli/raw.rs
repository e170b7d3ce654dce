//! # Raw Commands
//!
//! `request`, `upload` and `download`: direct access to the executor for any
//! resource path.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use futures::StreamExt;
use jirest_client::{Download, JiraClient, Method};
use serde_json::Value;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::output::{format_status, print_info, print_json, print_success, print_warning};

/// Arguments for `request`
#[derive(Args)]
pub struct RequestArgs {
  /// HTTP verb: GET, POST, PUT, PATCH, DELETE or HEAD
  #[arg(index = 1)]
  pub method: String,

  /// Resource path, e.g. `issue/PROJ-1`, or a full URL
  #[arg(index = 2)]
  pub path: String,

  /// JSON payload, or @FILE to read it from a file
  #[arg(long, short = 'd', value_name = "JSON")]
  pub data: Option<String>,
}

/// Arguments for `upload`
#[derive(Args)]
pub struct UploadArgs {
  /// Resource path, e.g. `issue/PROJ-1/attachments`
  #[arg(index = 1)]
  pub path: String,

  /// Files to upload
  #[arg(index = 2, required = true, num_args = 1..)]
  pub files: Vec<PathBuf>,
}

/// Arguments for `download`
#[derive(Args)]
pub struct DownloadArgs {
  /// Resource path or full URL, e.g. an attachment content URL
  #[arg(index = 1)]
  pub source: String,

  /// Write to this file instead of stdout
  #[arg(long, short = 'o', value_name = "FILE")]
  pub output: Option<PathBuf>,
}

pub(super) async fn handle_request_command(client: &JiraClient, args: &RequestArgs) -> Result<()> {
  let method = parse_method(&args.method)?;
  let payload = parse_payload(args.data.as_deref())?;

  let response = client.execute(&args.path, payload.as_ref(), method).await?;
  print_info(&format!("HTTP {}", format_status(response.status().as_u16())));

  match response.json() {
    Some(json) => print_json(json)?,
    None if !response.text().is_empty() => println!("{}", response.text()),
    None => {}
  }

  if let Some(error) = response.error() {
    bail!(error);
  }
  Ok(())
}

pub(super) async fn handle_upload_command(client: &JiraClient, args: &UploadArgs) -> Result<()> {
  let files = args.files.iter().map(|path| (String::new(), path));
  let responses = client.upload(&args.path, files).await?;

  let bodies: Vec<Value> = responses.iter().filter_map(|r| r.json().cloned()).collect();
  print_json(&Value::Array(bodies))?;

  let summary = format!("Uploaded {} of {} files", responses.len(), args.files.len());
  if responses.len() == args.files.len() {
    print_success(&summary);
  } else {
    print_warning(&summary);
  }
  Ok(())
}

pub(super) async fn handle_download_command(client: &JiraClient, args: &DownloadArgs) -> Result<()> {
  match client.download(&args.source, args.output.as_deref()).await? {
    Download::Saved { path, bytes } => {
      print_success(&format!("Saved {bytes} bytes to {}", path.display()));
    }
    Download::Stream(mut stream) => {
      let mut stdout = tokio::io::stdout();
      while let Some(chunk) = stream.next().await {
        stdout.write_all(&chunk?).await.context("Failed to write to stdout")?;
      }
      stdout.flush().await.context("Failed to flush stdout")?;
    }
  }
  Ok(())
}

/// Parse an HTTP verb, case-insensitively
pub(super) fn parse_method(input: &str) -> Result<Method> {
  let method = Method::from_bytes(input.to_ascii_uppercase().as_bytes())
    .with_context(|| format!("Invalid HTTP method '{input}'"))?;

  if !matches!(
    method,
    Method::GET | Method::POST | Method::PUT | Method::PATCH | Method::DELETE | Method::HEAD
  ) {
    bail!("Unsupported HTTP method '{method}'");
  }
  Ok(method)
}

/// Parse `--data`: inline JSON or `@path` to a JSON file
pub(super) fn parse_payload(data: Option<&str>) -> Result<Option<Value>> {
  let Some(data) = data else {
    return Ok(None);
  };

  let text = match data.strip_prefix('@') {
    Some(path) => {
      debug!(path, "Reading payload from file");
      std::fs::read_to_string(path).with_context(|| format!("Failed to read payload file {path}"))?
    }
    None => data.to_string(),
  };

  let value = serde_json::from_str(&text).context("Payload is not valid JSON")?;
  Ok(Some(value))
}
