//! Field endpoints

use reqwest::Method;
use tracing::info;

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::{Field, NewField};

impl JiraClient {
  /// All system and custom fields
  pub async fn get_fields(&self) -> Result<Vec<Field>> {
    self.get_entities("field", None).await
  }

  /// Create a custom field. Requires administrator permissions.
  pub async fn create_field(&self, field: &NewField) -> Result<Field> {
    let created: Field = self
      .execute_entity("field", field, Method::POST)
      .await?
      .expect_status(&[201])
      .into_entity()?;

    info!(id = created.id.as_deref().unwrap_or_default(), "Created custom field");
    Ok(created)
  }
}
