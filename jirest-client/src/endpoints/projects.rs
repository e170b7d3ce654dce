//! Project endpoints

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::Project;

impl JiraClient {
  /// Projects visible to the user
  pub async fn get_projects(&self) -> Result<Vec<Project>> {
    self.get_entities("project", None).await
  }

  /// Get a project by key or id
  pub async fn get_project(&self, project_key: &str) -> Result<Project> {
    self.get_entity(&format!("project/{project_key}"), None).await
  }
}
