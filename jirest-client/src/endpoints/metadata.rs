//! Instance-wide lookup lists: priorities, statuses and resolutions

use crate::client::JiraClient;
use crate::error::Result;
use crate::models::{Priority, Resolution, Status};

impl JiraClient {
  pub async fn get_priorities(&self) -> Result<Vec<Priority>> {
    self.get_entities("priority", None).await
  }

  pub async fn get_statuses(&self) -> Result<Vec<Status>> {
    self.get_entities("status", None).await
  }

  pub async fn get_resolutions(&self) -> Result<Vec<Resolution>> {
    self.get_entities("resolution", None).await
  }
}
