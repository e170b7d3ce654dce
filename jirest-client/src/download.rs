//! # Download Executor
//!
//! Fetches binary content such as attachment bodies. Without a destination
//! the body is handed back as a stream; with one it is written chunk by chunk
//! to a `.part` file beside the destination and renamed once complete.

use std::fmt;
use std::path::{Path, PathBuf};

use futures::StreamExt;
use reqwest::Method;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

use crate::client::JiraClient;
use crate::error::{JiraError, Result};
use crate::response::Response;
use crate::transport::{ByteStream, TransportRequest, TransportResponse};

/// Outcome of a download
pub enum Download {
  /// The body, not yet read
  Stream(ByteStream),
  /// The body was written to `path`
  Saved { path: PathBuf, bytes: u64 },
}

impl fmt::Debug for Download {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Download::Stream(_) => f.write_str("Download::Stream(..)"),
      Download::Saved { path, bytes } => f
        .debug_struct("Download::Saved")
        .field("path", path)
        .field("bytes", bytes)
        .finish(),
    }
  }
}

impl JiraClient {
  /// Download from an absolute URL or a path relative to the REST root.
  ///
  /// Error statuses are logged and returned as [`JiraError::Api`] with any
  /// messages the server reported.
  pub async fn download(&self, source: &str, destination: Option<&Path>) -> Result<Download> {
    let url = self.resolve(source)?;
    let request = TransportRequest::new(Method::GET, url.clone()).with_header("Accept", "*/*");

    let raw = self.send(request).await?;
    let status = raw.status;

    if !status.is_success() {
      let response = error_response(raw).await;
      error!(
        %url,
        status = status.as_u16(),
        body = %response.text(),
        "Download failed"
      );
      return Err(JiraError::Api {
        status: status.as_u16(),
        messages: response.error_messages(),
      });
    }

    let Some(destination) = destination else {
      debug!(%url, "Returning download as a stream");
      return Ok(Download::Stream(raw.body));
    };

    let bytes = write_stream(raw.body, destination, url.as_str()).await?;
    info!(%url, path = %destination.display(), bytes, "Saved download");

    Ok(Download::Saved {
      path: destination.to_path_buf(),
      bytes,
    })
  }
}

/// Read an error body, keeping status and headers when the body is lost
async fn error_response(raw: TransportResponse) -> Response {
  let status = raw.status;
  let headers = raw.headers.clone();
  Response::from_transport(raw)
    .await
    .unwrap_or_else(|_| Response::new(status, headers, b""))
}

/// Sibling of `destination` the body is written to before the rename
fn partial_path(destination: &Path) -> PathBuf {
  let mut name = destination.file_name().map(|n| n.to_os_string()).unwrap_or_default();
  name.push(".part");
  destination.with_file_name(name)
}

async fn write_stream(body: ByteStream, destination: &Path, url: &str) -> Result<u64> {
  if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
    tokio::fs::create_dir_all(parent).await.map_err(|source| JiraError::Io {
      path: parent.to_path_buf(),
      source,
    })?;
  }

  let partial = partial_path(destination);
  let result: Result<u64> = async {
    let written = write_partial(body, &partial, url).await?;
    tokio::fs::rename(&partial, destination).await.map_err(|source| JiraError::Io {
      path: destination.to_path_buf(),
      source,
    })?;
    Ok(written)
  }
  .await;

  if result.is_err()
    && let Err(remove_err) = tokio::fs::remove_file(&partial).await
    && remove_err.kind() != std::io::ErrorKind::NotFound
  {
    warn!(path = %partial.display(), error = %remove_err, "Could not remove partial download");
  }
  result
}

async fn write_partial(mut body: ByteStream, partial: &Path, url: &str) -> Result<u64> {
  let io_error = |source| JiraError::Io {
    path: partial.to_path_buf(),
    source,
  };

  let mut file = tokio::fs::File::create(partial).await.map_err(io_error)?;
  let mut written = 0u64;

  while let Some(chunk) = body.next().await {
    let chunk = chunk.map_err(|source| JiraError::Transport {
      url: url.to_string(),
      source,
    })?;
    file.write_all(&chunk).await.map_err(io_error)?;
    written += chunk.len() as u64;
  }

  file.flush().await.map_err(io_error)?;
  Ok(written)
}
