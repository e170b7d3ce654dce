//! # Resource Commands
//!
//! Typed lookups: `issue`, `issue-types` and `fields`.

use anyhow::Result;
use clap::Args;
use jirest_client::mapper::to_json;
use jirest_client::{Field, Issue, IssueQuery, IssueType, JiraClient};
use owo_colors::{OwoColorize, Stream};

use crate::output::{print_info, print_json, print_row};

/// Arguments for `issue`
#[derive(Args)]
pub struct IssueArgs {
  /// The Jira issue key (e.g., PROJ-123)
  #[arg(index = 1)]
  pub key: String,

  /// Only fetch these fields (comma separated)
  #[arg(long, value_delimiter = ',')]
  pub fields: Vec<String>,

  /// Print the issue as JSON
  #[arg(long)]
  pub json: bool,
}

/// Arguments for `fields`
#[derive(Args)]
pub struct FieldsArgs {
  /// Only list custom fields
  #[arg(long)]
  pub custom: bool,

  /// Print the fields as JSON
  #[arg(long)]
  pub json: bool,
}

pub(super) async fn handle_issue_command(client: &JiraClient, args: &IssueArgs) -> Result<()> {
  let query = IssueQuery {
    fields: args.fields.clone(),
    ..Default::default()
  };
  let issue = client.get_issue(&args.key, &query).await?;

  if args.json {
    return print_json(&to_json(&issue)?);
  }

  for (label, value) in issue_rows(&issue) {
    print_row(label, &value);
  }
  if let Some(key) = &issue.key {
    print_row("URL", &format!("{}/browse/{key}", client.host()));
  }
  Ok(())
}

pub(super) async fn handle_issue_types_command(client: &JiraClient) -> Result<()> {
  let issue_types = client.get_issue_types().await?;

  for issue_type in &issue_types {
    print_row(
      issue_type.id.as_deref().unwrap_or("-"),
      &describe_issue_type(issue_type),
    );
  }
  print_info(&format!("{} issue types", issue_types.len()));
  Ok(())
}

pub(super) async fn handle_fields_command(client: &JiraClient, args: &FieldsArgs) -> Result<()> {
  let fields: Vec<Field> = client
    .get_fields()
    .await?
    .into_iter()
    .filter(|field| !args.custom || field.custom == Some(true))
    .collect();

  if args.json {
    return print_json(&to_json(&fields)?);
  }

  for field in &fields {
    let field_type = field
      .schema
      .as_ref()
      .and_then(|schema| schema.field_type.as_deref())
      .unwrap_or("-");
    print_row(
      field.id.as_deref().unwrap_or("-"),
      &format!(
        "{} {}",
        field.name.as_deref().unwrap_or_default(),
        format!("({field_type})").if_supports_color(Stream::Stdout, |s| s.dimmed().to_string())
      ),
    );
  }
  print_info(&format!("{} fields", fields.len()));
  Ok(())
}

/// Label/value pairs shown for an issue. Unset fields are left out.
fn issue_rows(issue: &Issue) -> Vec<(&'static str, String)> {
  let mut rows = Vec::new();
  if let Some(key) = &issue.key {
    rows.push(("Key", key.clone()));
  }

  let Some(fields) = &issue.fields else {
    return rows;
  };

  let mut push = |label: &'static str, value: Option<String>| {
    if let Some(value) = value.filter(|v| !v.is_empty()) {
      rows.push((label, value));
    }
  };

  push("Summary", fields.summary.clone());
  push("Type", fields.issuetype.as_ref().and_then(|t| t.name.clone()));
  push("Status", fields.status.as_ref().and_then(|s| s.name.clone()));
  push("Priority", fields.priority.as_ref().and_then(|p| p.name.clone()));
  push(
    "Assignee",
    Some(
      fields
        .assignee
        .as_ref()
        .and_then(|a| a.display_name.clone())
        .unwrap_or_else(|| "Unassigned".to_string()),
    ),
  );
  push("Labels", fields.labels.as_ref().map(|labels| labels.join(", ")));
  push("Updated", fields.updated.clone());
  push(
    "Custom fields",
    (!fields.custom_fields.is_empty()).then(|| fields.custom_fields.len().to_string()),
  );

  rows
}

fn describe_issue_type(issue_type: &IssueType) -> String {
  let name = issue_type.name.as_deref().unwrap_or_default();
  if issue_type.subtask == Some(true) {
    format!("{name} (sub-task)")
  } else {
    name.to_string()
  }
}

#[cfg(test)]
mod tests {
  use jirest_client::mapper::from_json;
  use serde_json::json;

  use super::*;

  #[test]
  fn test_issue_rows() {
    let issue: Issue = from_json(json!({
        "key": "PROJ-9",
        "fields": {
            "summary": "Crash on save",
            "status": { "name": "Open" },
            "labels": ["crash", "editor"],
            "customfield_10010": 5
        }
    }))
    .unwrap();

    let rows = issue_rows(&issue);
    assert_eq!(
      rows,
      vec![
        ("Key", "PROJ-9".to_string()),
        ("Summary", "Crash on save".to_string()),
        ("Status", "Open".to_string()),
        ("Assignee", "Unassigned".to_string()),
        ("Labels", "crash, editor".to_string()),
        ("Custom fields", "1".to_string()),
      ]
    );
  }

  #[test]
  fn test_describe_issue_type() {
    let subtask = IssueType {
      subtask: Some(true),
      ..IssueType::with_name("Sub-task")
    };
    assert_eq!(describe_issue_type(&subtask), "Sub-task (sub-task)");
    assert_eq!(describe_issue_type(&IssueType::with_name("Bug")), "Bug");
  }
}
