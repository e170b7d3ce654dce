//! # Jira API Endpoints
//!
//! Typed operations for the Jira resources, each one an `execute` call with
//! an expected status and a record to map the body onto.

pub mod attachments;
pub mod fields;
pub mod issue_types;
pub mod issues;
pub mod metadata;
pub mod projects;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support {
  use wiremock::MockServer;

  use crate::client::{JiraClient, create_jira_client};

  /// A client pointed at the mock server with `test_user:test_token`
  pub fn client_for(server: &MockServer) -> JiraClient {
    create_jira_client(&server.uri(), "test_user", "test_token").unwrap()
  }
}
