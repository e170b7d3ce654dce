//! # File Upload Executor
//!
//! Posts local files as multipart form data, one request per file, all in
//! flight at once.

use std::path::Path;

use futures::future::join_all;
use reqwest::Method;
use tracing::{error, info, warn};
use url::Url;

use crate::client::JiraClient;
use crate::consts::{ATLASSIAN_TOKEN_HEADER, ATLASSIAN_TOKEN_NO_CHECK, MULTIPART_FILE_FIELD};
use crate::error::{JiraError, Result};
use crate::response::Response;
use crate::transport::{FilePart, RequestBody, TransportRequest};

impl JiraClient {
  /// Upload files to a resource path.
  ///
  /// `files` maps the name sent for each part to a local path; an empty name
  /// falls back to the file's own name. Files that cannot be read are logged
  /// and skipped. Returns the responses of the uploads that succeeded, in
  /// input order.
  pub async fn upload<I, N, P>(&self, path: &str, files: I) -> Result<Vec<Response>>
  where
    I: IntoIterator<Item = (N, P)>,
    N: Into<String>,
    P: AsRef<Path>,
  {
    let url = self.resolve(path)?;

    let mut parts = Vec::new();
    for (name, local) in files {
      let local = local.as_ref();
      match tokio::fs::read(local).await {
        Ok(content) => parts.push(FilePart {
          field: MULTIPART_FILE_FIELD.to_string(),
          file_name: part_name(name.into(), local),
          content,
        }),
        Err(source) => {
          let err = JiraError::Io {
            path: local.to_path_buf(),
            source,
          };
          error!(error = %err, "Skipping file that cannot be uploaded");
        }
      }
    }

    let attempted = parts.len();
    let results = join_all(parts.into_iter().map(|part| self.upload_part(url.clone(), part))).await;

    let uploaded: Vec<Response> = results
      .into_iter()
      .filter_map(|result| match result {
        Ok(response) if response.status().is_success() => Some(response),
        Ok(response) => {
          warn!(status = response.status().as_u16(), "Upload was rejected");
          None
        }
        // Already logged by the executor
        Err(_) => None,
      })
      .collect();

    info!(%url, attempted, uploaded = uploaded.len(), "Finished uploading files");
    Ok(uploaded)
  }

  async fn upload_part(&self, url: Url, part: FilePart) -> Result<Response> {
    let request = TransportRequest::new(Method::POST, url)
      .with_header(ATLASSIAN_TOKEN_HEADER, ATLASSIAN_TOKEN_NO_CHECK)
      .with_body(RequestBody::Multipart(part));

    self.dispatch(request).await
  }
}

fn part_name(name: String, local: &Path) -> String {
  if !name.is_empty() {
    return name;
  }

  local
    .file_name()
    .map(|n| n.to_string_lossy().into_owned())
    .unwrap_or_else(|| local.display().to_string())
}

#[cfg(test)]
mod tests {
  use jirest_test_utils::{FixtureDir, LogCapture};
  use serde_json::json;
  use wiremock::matchers::{body_string_contains, header, method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::client::create_jira_client;

  async fn mount_upload(server: &MockServer, contents: &str, id: &str) {
    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/PROJ-1/attachments"))
      .and(header("X-Atlassian-Token", "no-check"))
      .and(body_string_contains(contents))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([{ "id": id }])))
      .expect(1)
      .mount(server)
      .await;
  }

  #[tokio::test]
  async fn test_missing_file_is_skipped() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    mount_upload(&mock_server, "alpha contents", "1").await;
    mount_upload(&mock_server, "gamma contents", "3").await;

    let fixtures = FixtureDir::new();
    let files = vec![
      ("alpha.txt", fixtures.file("alpha.txt", "alpha contents")),
      ("beta.txt", fixtures.missing("beta.txt")),
      ("gamma.txt", fixtures.file("gamma.txt", "gamma contents")),
    ];

    let logs = LogCapture::new();
    let _guard = logs.set_default();

    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;
    let responses = client.upload("issue/PROJ-1/attachments", files).await?;

    let ids: Vec<_> = responses.iter().filter_map(|r| r.json().cloned()).collect();
    assert_eq!(ids, vec![json!([{ "id": "1" }]), json!([{ "id": "3" }])]);

    let skipped = logs.lines_containing("Skipping file that cannot be uploaded");
    assert_eq!(skipped.len(), 1);
    assert!(skipped[0].contains("beta.txt"));

    Ok(())
  }

  #[tokio::test]
  async fn test_rejected_upload_is_dropped() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    mount_upload(&mock_server, "good contents", "10").await;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/PROJ-1/attachments"))
      .and(body_string_contains("huge contents"))
      .respond_with(ResponseTemplate::new(413).set_body_json(json!({
          "errorMessages": ["The file is too large"],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let fixtures = FixtureDir::new();
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;
    let responses = client
      .upload(
        "issue/PROJ-1/attachments",
        [
          ("good.txt", fixtures.file("good.txt", "good contents")),
          ("huge.bin", fixtures.file("huge.bin", "huge contents")),
        ],
      )
      .await?;

    assert_eq!(responses.len(), 1);
    assert_eq!(responses[0].json(), Some(&json!([{ "id": "10" }])));

    Ok(())
  }

  #[tokio::test]
  async fn test_part_carries_file_name() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue/PROJ-1/attachments"))
      .and(body_string_contains("name=\"file\""))
      .and(body_string_contains("filename=\"renamed.log\""))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
      .expect(1)
      .mount(&mock_server)
      .await;

    let fixtures = FixtureDir::new();
    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;
    let responses = client
      .upload(
        "issue/PROJ-1/attachments",
        [("renamed.log", fixtures.file("original.log", "log line"))],
      )
      .await?;

    assert_eq!(responses.len(), 1);
    Ok(())
  }

  #[test]
  fn test_part_name_falls_back_to_file_name() {
    assert_eq!(part_name(String::new(), Path::new("/tmp/report.pdf")), "report.pdf");
    assert_eq!(part_name("custom.pdf".to_string(), Path::new("/tmp/report.pdf")), "custom.pdf");
  }

  #[tokio::test]
  async fn test_nothing_to_upload() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let fixtures = FixtureDir::new();

    let client = create_jira_client(&mock_server.uri(), "test_user", "test_token")?;
    let responses = client
      .upload("issue/PROJ-1/attachments", [("gone.txt", fixtures.missing("gone.txt"))])
      .await?;

    assert!(responses.is_empty());
    assert!(mock_server.received_requests().await.unwrap_or_default().is_empty());
    Ok(())
  }
}
