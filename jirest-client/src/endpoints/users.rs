//! User endpoints

use serde_json::json;

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::User;

impl JiraClient {
  /// The user the client authenticates as
  pub async fn get_myself(&self) -> Result<User> {
    self.get_entity("myself", None).await
  }

  /// Search users by name, display name or email
  pub async fn find_users(&self, query: &str) -> Result<Vec<User>> {
    let payload = json!({ "query": query });
    self.get_entities("user/search", Some(&payload)).await
  }
}
