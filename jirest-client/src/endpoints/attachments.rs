//! Attachment endpoints

use std::path::Path;

use reqwest::Method;

use crate::client::JiraClient;
use crate::download::Download;
use crate::error::Result;
use crate::models::Attachment;

impl JiraClient {
  /// Attachment metadata
  pub async fn get_attachment(&self, id: &str) -> Result<Attachment> {
    self.get_entity(&format!("attachment/{id}"), None).await
  }

  pub async fn delete_attachment(&self, id: &str) -> Result<()> {
    self
      .execute(&format!("attachment/{id}"), None, Method::DELETE)
      .await?
      .expect_status(&[204])
      .ensure_success()?;
    Ok(())
  }

  /// Download an attachment's content, streamed or saved to `destination`.
  ///
  /// Uses the `content` URL from the metadata, or the `attachment/content`
  /// resource when the server does not report one.
  pub async fn download_attachment(&self, id: &str, destination: Option<&Path>) -> Result<Download> {
    let attachment = self.get_attachment(id).await?;
    let source = attachment
      .content
      .unwrap_or_else(|| format!("attachment/content/{id}"));

    self.download(&source, destination).await
  }
}

#[cfg(test)]
mod tests {
  use jirest_test_utils::FixtureDir;
  use serde_json::json;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;
  use crate::endpoints::test_support::client_for;

  #[tokio::test]
  async fn test_download_attachment_follows_content_url() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/attachment/10100"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "id": "10100",
          "filename": "trace.log",
          "size": 8,
          "content": format!("{}/secure/attachment/10100/trace.log", mock_server.uri())
      })))
      .mount(&mock_server)
      .await;

    Mock::given(method("GET"))
      .and(path("/secure/attachment/10100/trace.log"))
      .respond_with(ResponseTemplate::new(200).set_body_bytes(b"stack...".to_vec()))
      .expect(1)
      .mount(&mock_server)
      .await;

    let fixtures = FixtureDir::new();
    let destination = fixtures.missing("trace.log");
    let download = client_for(&mock_server)
      .download_attachment("10100", Some(&destination))
      .await?;

    assert!(matches!(download, Download::Saved { bytes: 8, .. }));
    assert_eq!(std::fs::read(&destination)?, b"stack...");

    Ok(())
  }

  #[tokio::test]
  async fn test_delete_attachment() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
      .and(path("/rest/api/2/attachment/10100"))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    client_for(&mock_server).delete_attachment("10100").await?;

    Ok(())
  }

  #[tokio::test]
  async fn test_delete_attachment_forbidden() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
      .and(path("/rest/api/2/attachment/10100"))
      .respond_with(ResponseTemplate::new(403).set_body_json(json!({
          "errorMessages": ["You do not have permission to delete attachments for this issue."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let err = client_for(&mock_server)
      .delete_attachment("10100")
      .await
      .unwrap_err();
    assert_eq!(err.status(), Some(403));

    Ok(())
  }
}
