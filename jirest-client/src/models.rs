//! # Jira Records
//!
//! Passive records mirroring the JSON the REST API exchanges. Every field is
//! optional: a record starts out empty, gets populated from whatever the
//! server sent, and drops unset fields when serialized through
//! [`mapper::to_json`](crate::mapper::to_json).
//!
//! Records are also used as selectors in write payloads, e.g.
//! `Project::with_key("PROJ")` serializes to `{"key":"PROJ"}`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Represents a Jira issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Issue {
  pub expand: Option<String>,
  pub id: Option<String>,
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub key: Option<String>,
  pub fields: Option<IssueFields>,
}

impl Issue {
  /// Selector for an issue by key
  pub fn with_key(key: &str) -> Self {
    Self {
      key: Some(key.to_string()),
      ..Default::default()
    }
  }
}

/// Represents the `fields` object of an issue.
///
/// Anything the record has no slot for, `customfield_*` entries in
/// particular, lands in `custom_fields`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IssueFields {
  pub summary: Option<String>,
  /// Plain text on REST v2, an Atlassian document on v3
  pub description: Option<Value>,
  pub issuetype: Option<IssueType>,
  pub project: Option<Project>,
  pub priority: Option<Priority>,
  pub status: Option<Status>,
  pub resolution: Option<Resolution>,
  pub assignee: Option<User>,
  pub reporter: Option<User>,
  pub creator: Option<User>,
  pub labels: Option<Vec<String>>,
  pub components: Option<Vec<Component>>,
  pub versions: Option<Vec<Version>>,
  #[serde(rename = "fixVersions")]
  pub fix_versions: Option<Vec<Version>>,
  pub duedate: Option<String>,
  pub created: Option<String>,
  pub updated: Option<String>,
  pub resolutiondate: Option<String>,
  pub environment: Option<Value>,
  pub parent: Option<Box<Issue>>,
  pub attachment: Option<Vec<Attachment>>,
  pub comment: Option<Comments>,
  pub subtasks: Option<Vec<Issue>>,
  pub timetracking: Option<TimeTracking>,
  #[serde(flatten)]
  pub custom_fields: BTreeMap<String, Value>,
}

impl IssueFields {
  /// Set a custom field value, e.g. `customfield_10010`
  pub fn set_custom_field(&mut self, id: &str, value: Value) -> &mut Self {
    self.custom_fields.insert(id.to_string(), value);
    self
  }
}

/// Represents an issue type
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct IssueType {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub description: Option<String>,
  pub icon_url: Option<String>,
  pub name: Option<String>,
  pub subtask: Option<bool>,
  pub avatar_id: Option<i64>,
  pub hierarchy_level: Option<i64>,
}

impl IssueType {
  pub fn with_name(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }

  pub fn with_id(id: &str) -> Self {
    Self {
      id: Some(id.to_string()),
      ..Default::default()
    }
  }
}

/// Represents a system or custom field definition
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Field {
  pub id: Option<String>,
  pub key: Option<String>,
  pub name: Option<String>,
  pub custom: Option<bool>,
  pub orderable: Option<bool>,
  pub navigable: Option<bool>,
  pub searchable: Option<bool>,
  pub clause_names: Option<Vec<String>>,
  pub schema: Option<FieldSchema>,
}

/// Describes the value type of a field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FieldSchema {
  #[serde(rename = "type")]
  pub field_type: Option<String>,
  pub items: Option<String>,
  pub system: Option<String>,
  pub custom: Option<String>,
  pub custom_id: Option<i64>,
}

/// Payload for creating a custom field
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NewField {
  pub name: Option<String>,
  pub description: Option<String>,
  /// Custom field type key, e.g. `com.atlassian.jira.plugin.system.customfieldtypes:textfield`
  #[serde(rename = "type")]
  pub field_type: Option<String>,
  pub searcher_key: Option<String>,
}

/// Represents a project
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Project {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub key: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub project_type_key: Option<String>,
  pub lead: Option<User>,
  pub issue_types: Option<Vec<IssueType>>,
  pub components: Option<Vec<Component>>,
  pub versions: Option<Vec<Version>>,
  pub avatar_urls: Option<BTreeMap<String, String>>,
}

impl Project {
  pub fn with_key(key: &str) -> Self {
    Self {
      key: Some(key.to_string()),
      ..Default::default()
    }
  }
}

/// Represents a user account
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  /// Cloud identifier
  pub account_id: Option<String>,
  /// Server/Data Center username
  pub name: Option<String>,
  pub key: Option<String>,
  pub email_address: Option<String>,
  pub display_name: Option<String>,
  pub active: Option<bool>,
  pub time_zone: Option<String>,
  pub avatar_urls: Option<BTreeMap<String, String>>,
}

impl User {
  pub fn with_account_id(account_id: &str) -> Self {
    Self {
      account_id: Some(account_id.to_string()),
      ..Default::default()
    }
  }

  pub fn with_name(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Represents an issue priority
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Priority {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub icon_url: Option<String>,
  pub status_color: Option<String>,
}

impl Priority {
  pub fn with_name(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Represents a workflow status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Status {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub icon_url: Option<String>,
  pub status_category: Option<StatusCategory>,
}

/// Represents the category a status belongs to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StatusCategory {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<i64>,
  pub key: Option<String>,
  pub name: Option<String>,
  pub color_name: Option<String>,
}

/// Represents an issue resolution
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Resolution {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
}

/// Represents a project component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Component {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
}

impl Component {
  pub fn with_name(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Represents a project version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Version {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub name: Option<String>,
  pub description: Option<String>,
  pub archived: Option<bool>,
  pub released: Option<bool>,
  pub release_date: Option<String>,
  pub project_id: Option<i64>,
}

impl Version {
  pub fn with_name(name: &str) -> Self {
    Self {
      name: Some(name.to_string()),
      ..Default::default()
    }
  }
}

/// Represents a file attached to an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Attachment {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub filename: Option<String>,
  pub author: Option<User>,
  pub created: Option<String>,
  pub size: Option<u64>,
  pub mime_type: Option<String>,
  /// Absolute URL of the file content
  pub content: Option<String>,
  pub thumbnail: Option<String>,
}

/// Represents an issue comment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comment {
  #[serde(rename = "self")]
  pub self_url: Option<String>,
  pub id: Option<String>,
  pub author: Option<User>,
  /// Plain text on REST v2, an Atlassian document on v3
  pub body: Option<Value>,
  pub update_author: Option<User>,
  pub created: Option<String>,
  pub updated: Option<String>,
}

/// Represents a page of comments
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Comments {
  pub start_at: Option<u64>,
  pub max_results: Option<u64>,
  pub total: Option<u64>,
  pub comments: Option<Vec<Comment>>,
}

/// Represents a workflow transition available on an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transition {
  pub id: Option<String>,
  pub name: Option<String>,
  pub to: Option<Status>,
  pub has_screen: Option<bool>,
}

/// Represents the list of transitions for an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Transitions {
  pub expand: Option<String>,
  pub transitions: Option<Vec<Transition>>,
}

/// Represents time tracking estimates on an issue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimeTracking {
  pub original_estimate: Option<String>,
  pub remaining_estimate: Option<String>,
  pub time_spent: Option<String>,
  pub original_estimate_seconds: Option<i64>,
  pub remaining_estimate_seconds: Option<i64>,
  pub time_spent_seconds: Option<i64>,
}

/// Represents one page of a JQL search
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchResult {
  pub expand: Option<String>,
  pub start_at: Option<u64>,
  pub max_results: Option<u64>,
  pub total: Option<u64>,
  pub issues: Option<Vec<Issue>>,
}

/// Returned when an issue is created
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CreatedIssue {
  pub id: Option<String>,
  pub key: Option<String>,
  #[serde(rename = "self")]
  pub self_url: Option<String>,
}

/// Query parameters for fetching one issue
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IssueQuery {
  /// Fields to return; all navigable fields when empty
  pub fields: Vec<String>,
  pub expand: Vec<String>,
}

/// Query parameters for a JQL search. Pagination values are passed through.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchQuery {
  pub jql: String,
  pub start_at: Option<u32>,
  pub max_results: Option<u32>,
  pub fields: Vec<String>,
  pub expand: Vec<String>,
}

impl SearchQuery {
  pub fn new(jql: &str) -> Self {
    Self {
      jql: jql.to_string(),
      ..Default::default()
    }
  }
}
