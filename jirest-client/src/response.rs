//! # Response Classifier
//!
//! [`Response`] normalizes one HTTP exchange: status, headers, raw text and
//! the JSON body when there is one. A response is erroneous when its status is
//! outside the expected set, when the server reports errors in the payload, or
//! when the status itself is a 4xx/5xx.

use reqwest::StatusCode;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{JiraError, Result};
use crate::mapper;
use crate::transport::{TransportError, TransportResponse};

/// A buffered HTTP response
#[derive(Debug, Clone)]
pub struct Response {
  status: StatusCode,
  headers: HeaderMap,
  text: String,
  json: Option<Value>,
  status_error: Option<String>,
}

impl Response {
  /// Wrap a raw response. Empty or non-JSON bodies leave [`Response::json`]
  /// unset.
  pub fn new(status: StatusCode, headers: HeaderMap, body: &[u8]) -> Self {
    let json = if body.iter().all(u8::is_ascii_whitespace) {
      None
    } else {
      serde_json::from_slice(body).ok()
    };

    Self {
      status,
      headers,
      text: String::from_utf8_lossy(body).into_owned(),
      json,
      status_error: None,
    }
  }

  /// Buffer a transport response
  pub async fn from_transport(response: TransportResponse) -> std::result::Result<Self, TransportError> {
    let status = response.status;
    let headers = response.headers.clone();
    let body = response.bytes().await?;
    Ok(Self::new(status, headers, &body))
  }

  /// Flag the response when its status is not one of `expected`
  pub fn expect_status(mut self, expected: &[u16]) -> Self {
    let actual = self.status.as_u16();
    if !expected.is_empty() && !expected.contains(&actual) {
      let expected = expected
        .iter()
        .map(u16::to_string)
        .collect::<Vec<_>>()
        .join(" or ");
      self.status_error = Some(format!("Expected status code {expected}, got {actual}"));
    }
    self
  }

  pub fn status(&self) -> StatusCode {
    self.status
  }

  pub fn headers(&self) -> &HeaderMap {
    &self.headers
  }

  /// Header value, if present and valid UTF-8
  pub fn header(&self, name: &str) -> Option<&str> {
    self.headers.get(name).and_then(|value| value.to_str().ok())
  }

  pub fn text(&self) -> &str {
    &self.text
  }

  pub fn json(&self) -> Option<&Value> {
    self.json.as_ref()
  }

  /// Messages from the `errorMessages` array and the `errors` object
  pub fn server_errors(&self) -> Vec<String> {
    let Some(Value::Object(body)) = &self.json else {
      return Vec::new();
    };

    let mut messages: Vec<String> = body
      .get("errorMessages")
      .and_then(Value::as_array)
      .map(|items| items.iter().map(render_message).collect())
      .unwrap_or_default();

    if let Some(Value::Object(errors)) = body.get("errors") {
      messages.extend(
        errors
          .iter()
          .map(|(field, message)| format!("{field}: {}", render_message(message))),
      );
    }

    messages
  }

  /// Every reason this response is erroneous, most specific first
  pub fn error_messages(&self) -> Vec<String> {
    let mut messages: Vec<String> = self.status_error.iter().cloned().collect();
    messages.extend(self.server_errors());

    if messages.is_empty() && (self.status.is_client_error() || self.status.is_server_error()) {
      messages.push(format!("HTTP {}", self.status));
    }
    messages
  }

  pub fn is_error(&self) -> bool {
    !self.error_messages().is_empty()
  }

  /// All error messages joined, if the response is erroneous
  pub fn error(&self) -> Option<String> {
    let messages = self.error_messages();
    (!messages.is_empty()).then(|| messages.join("; "))
  }

  /// Turn an erroneous response into [`JiraError::Api`]
  pub fn ensure_success(self) -> Result<Self> {
    let messages = self.error_messages();
    if messages.is_empty() {
      Ok(self)
    } else {
      Err(JiraError::Api {
        status: self.status.as_u16(),
        messages,
      })
    }
  }

  /// The JSON body of a successful response
  pub fn into_json(self) -> Result<Value> {
    let response = self.ensure_success()?;
    let status = response.status.as_u16();
    response.json.ok_or(JiraError::MissingBody { status })
  }

  /// Map the body of a successful response onto a record
  pub fn into_entity<T>(self) -> Result<T>
  where
    T: DeserializeOwned + Serialize,
  {
    mapper::from_json(self.into_json()?)
  }

  /// Map a JSON array body onto a list of records
  pub fn into_entities<T>(self) -> Result<Vec<T>>
  where
    T: DeserializeOwned + Serialize,
  {
    match self.into_json()? {
      Value::Array(items) => items.into_iter().map(mapper::from_json).collect(),
      other => Ok(vec![mapper::from_json(other)?]),
    }
  }
}

fn render_message(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

#[cfg(test)]
mod tests {
  use insta::assert_snapshot;
  use serde_json::json;

  use super::*;
  use crate::models::IssueType;

  fn response(status: u16, body: &str) -> Response {
    Response::new(
      StatusCode::from_u16(status).unwrap(),
      HeaderMap::new(),
      body.as_bytes(),
    )
  }

  #[test]
  fn test_parses_json_body() {
    let resp = response(200, r#"{"id":"1","name":"Bug"}"#);
    assert_eq!(resp.json(), Some(&json!({"id": "1", "name": "Bug"})));
    assert!(!resp.is_error());
    assert_eq!(resp.error(), None);
  }

  #[test]
  fn test_empty_and_non_json_bodies() {
    let empty = response(204, "");
    assert_eq!(empty.json(), None);
    assert_eq!(empty.text(), "");
    assert!(!empty.is_error());

    let html = response(200, "<html>maintenance</html>");
    assert_eq!(html.json(), None);
    assert_eq!(html.text(), "<html>maintenance</html>");
  }

  #[test]
  fn test_unexpected_status() {
    let resp = response(200, "{}").expect_status(&[201]);
    assert!(resp.is_error());
    assert_snapshot!(resp.error().unwrap(), @"Expected status code 201, got 200");

    let resp = response(400, "{}").expect_status(&[200, 204]);
    assert_snapshot!(resp.error().unwrap(), @"Expected status code 200 or 204, got 400");
  }

  #[test]
  fn test_expected_status_is_not_an_error() {
    let resp = response(204, "").expect_status(&[200, 204]);
    assert!(!resp.is_error());
  }

  #[test]
  fn test_server_error_fields() {
    let resp = response(
      400,
      r#"{"errorMessages":["Project is archived"],"errors":{"summary":"You must specify a summary of the issue."}}"#,
    );
    assert!(resp.is_error());
    assert_eq!(
      resp.server_errors(),
      vec![
        "Project is archived".to_string(),
        "summary: You must specify a summary of the issue.".to_string()
      ]
    );
  }

  #[test]
  fn test_empty_error_fields_on_success() {
    let resp = response(200, r#"{"errorMessages":[],"errors":{}}"#);
    assert!(!resp.is_error());
  }

  #[test]
  fn test_error_status_without_payload() {
    let resp = response(502, "Bad Gateway");
    assert!(resp.is_error());
    assert_eq!(resp.error().as_deref(), Some("HTTP 502 Bad Gateway"));
  }

  #[test]
  fn test_into_entity() {
    let issue_type: IssueType = response(200, r#"{"id":"10001","name":"Bug","scope":{}}"#)
      .into_entity()
      .unwrap();
    assert_eq!(issue_type.name.as_deref(), Some("Bug"));
  }

  #[test]
  fn test_into_entity_surfaces_api_error() {
    let err = response(404, r#"{"errorMessages":["Issue does not exist"],"errors":{}}"#)
      .expect_status(&[200])
      .into_entity::<IssueType>()
      .unwrap_err();

    match err {
      JiraError::Api { status, messages } => {
        assert_eq!(status, 404);
        assert_eq!(
          messages,
          vec!["Expected status code 200, got 404".to_string(), "Issue does not exist".to_string()]
        );
      }
      other => panic!("unexpected error: {other}"),
    }
  }

  #[test]
  fn test_into_json_requires_body() {
    let err = response(204, "").into_json().unwrap_err();
    assert!(matches!(err, JiraError::MissingBody { status: 204 }));
  }

  #[test]
  fn test_into_entities() {
    let types: Vec<IssueType> = response(200, r#"[{"name":"Bug"},{"name":"Task"}]"#)
      .into_entities()
      .unwrap();
    let names: Vec<_> = types.iter().filter_map(|t| t.name.as_deref()).collect();
    assert_eq!(names, vec!["Bug", "Task"]);
  }

  #[test]
  fn test_header_lookup() {
    let mut headers = HeaderMap::new();
    headers.insert("X-AREQUESTID", "abc123".parse().unwrap());
    let resp = Response::new(StatusCode::OK, headers, b"");
    assert_eq!(resp.header("x-arequestid"), Some("abc123"));
    assert_eq!(resp.header("missing"), None);
  }
}
