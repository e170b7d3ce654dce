//! # Jira Issue Endpoints
//!
//! Fetching, creating, updating, deleting and searching issues, plus the
//! per-issue attachments, transitions and comments resources.

use std::path::Path;

use reqwest::Method;
use serde_json::{Value, json};
use tracing::info;

use crate::client::JiraClient;
use crate::error::Result;
use crate::mapper;
use crate::models::{
  Attachment, Comment, Comments, CreatedIssue, Issue, IssueFields, IssueQuery, SearchQuery, SearchResult, Transitions,
};

impl JiraClient {
  /// Get a Jira issue by key
  pub async fn get_issue(&self, issue_key: &str, query: &IssueQuery) -> Result<Issue> {
    let payload = mapper::to_json(query)?;
    self.get_entity(&format!("issue/{issue_key}"), Some(&payload)).await
  }

  /// Create an issue from its fields
  pub async fn create_issue(&self, fields: &IssueFields) -> Result<CreatedIssue> {
    let payload = json!({ "fields": mapper::to_json(fields)? });

    let created: CreatedIssue = self
      .execute("issue", Some(&payload), Method::POST)
      .await?
      .expect_status(&[201])
      .into_entity()?;

    info!(key = created.key.as_deref().unwrap_or_default(), "Created issue");
    Ok(created)
  }

  /// Update the given fields of an issue; unset fields are left alone
  pub async fn update_issue(&self, issue_key: &str, fields: &IssueFields) -> Result<()> {
    let payload = json!({ "fields": mapper::to_json(fields)? });

    self
      .execute(&format!("issue/{issue_key}"), Some(&payload), Method::PUT)
      .await?
      .expect_status(&[204])
      .ensure_success()?;
    Ok(())
  }

  /// Delete an issue. Issues with subtasks can only be deleted together with
  /// them.
  pub async fn delete_issue(&self, issue_key: &str, delete_subtasks: bool) -> Result<()> {
    self
      .execute(
        &format!("issue/{issue_key}?deleteSubtasks={delete_subtasks}"),
        None,
        Method::DELETE,
      )
      .await?
      .expect_status(&[204])
      .ensure_success()?;

    info!(key = issue_key, "Deleted issue");
    Ok(())
  }

  /// Run a JQL search
  pub async fn search_issues(&self, query: &SearchQuery) -> Result<SearchResult> {
    let payload = mapper::to_json(query)?;
    self.get_entity("search", Some(&payload)).await
  }

  /// Attach local files to an issue. Files that are missing or rejected are
  /// left out of the result.
  pub async fn add_attachments<I, N, P>(&self, issue_key: &str, files: I) -> Result<Vec<Attachment>>
  where
    I: IntoIterator<Item = (N, P)>,
    N: Into<String>,
    P: AsRef<Path>,
  {
    let responses = self.upload(&format!("issue/{issue_key}/attachments"), files).await?;

    let mut attachments = Vec::new();
    for response in responses {
      attachments.extend(response.into_entities::<Attachment>()?);
    }
    Ok(attachments)
  }

  /// Get the transitions available on an issue
  pub async fn get_transitions(&self, issue_key: &str) -> Result<Transitions> {
    self
      .get_entity(&format!("issue/{issue_key}/transitions"), None)
      .await
  }

  /// Move an issue through a workflow transition
  pub async fn transition_issue(&self, issue_key: &str, transition_id: &str) -> Result<()> {
    let payload = json!({ "transition": { "id": transition_id } });

    self
      .execute(&format!("issue/{issue_key}/transitions"), Some(&payload), Method::POST)
      .await?
      .expect_status(&[204])
      .ensure_success()?;
    Ok(())
  }

  pub async fn get_comments(&self, issue_key: &str) -> Result<Comments> {
    self.get_entity(&format!("issue/{issue_key}/comment"), None).await
  }

  /// Add a comment. `body` is plain text on REST v2 and an Atlassian document
  /// on v3.
  pub async fn add_comment(&self, issue_key: &str, body: impl Into<Value>) -> Result<Comment> {
    let payload = json!({ "body": body.into() });

    self
      .execute(&format!("issue/{issue_key}/comment"), Some(&payload), Method::POST)
      .await?
      .expect_status(&[201])
      .into_entity()
  }
}
