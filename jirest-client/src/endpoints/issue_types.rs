//! Issue type endpoints

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::IssueType;

impl JiraClient {
  /// All issue types visible to the user
  pub async fn get_issue_types(&self) -> Result<Vec<IssueType>> {
    self.get_entities("issuetype", None).await
  }

  pub async fn get_issue_type(&self, id: &str) -> Result<IssueType> {
    self.get_entity(&format!("issuetype/{id}"), None).await
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;
  use wiremock::matchers::{method, path};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use crate::endpoints::test_support::client_for;

  #[tokio::test]
  async fn test_get_issue_types() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issuetype"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!([
          { "id": "1", "name": "Bug", "subtask": false, "untranslatedName": "Bug" },
          { "id": "5", "name": "Sub-task", "subtask": true }
      ])))
      .mount(&mock_server)
      .await;

    let types = client_for(&mock_server).get_issue_types().await?;

    assert_eq!(types.len(), 2);
    assert_eq!(types[0].name.as_deref(), Some("Bug"));
    assert_eq!(types[1].subtask, Some(true));

    Ok(())
  }

  #[tokio::test]
  async fn test_get_issue_type() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issuetype/10001"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({
          "id": "10001",
          "name": "Story",
          "description": "Functionality or a feature expressed as a user goal.",
          "hierarchyLevel": 0
      })))
      .mount(&mock_server)
      .await;

    let issue_type = client_for(&mock_server).get_issue_type("10001").await?;

    assert_eq!(issue_type.name.as_deref(), Some("Story"));
    assert_eq!(issue_type.hierarchy_level, Some(0));

    Ok(())
  }
}
