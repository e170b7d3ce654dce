//! # Request Executor
//!
//! [`JiraClient`] turns `(path, payload, verb)` into an HTTP call on the
//! configured [`Transport`] and hands back a [`Response`]. Connectivity
//! failures are logged as critical and come back as
//! [`JiraError::Unreachable`]; HTTP error statuses are logged and still
//! returned as a [`Response`] so the caller can classify them.

use std::sync::Arc;

use jirest_core::JiraConfig;
use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::consts::{REDACTED, SENSITIVE_HEADERS, SEVERITY_CRITICAL};
use crate::error::{JiraError, Result};
use crate::mapper;
use crate::response::Response;
use crate::transport::{ReqwestTransport, RequestBody, Transport, TransportError, TransportRequest, TransportResponse};

/// Represents a Jira API client
#[derive(Clone)]
pub struct JiraClient {
  pub(crate) transport: Arc<dyn Transport>,
  pub(crate) api_root: Url,
  pub(crate) host: String,
}

impl std::fmt::Debug for JiraClient {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("JiraClient")
      .field("api_root", &self.api_root.as_str())
      .finish_non_exhaustive()
  }
}

impl JiraClient {
  /// Create a client using the `reqwest` transport
  pub fn new(config: &JiraConfig) -> Result<Self> {
    let mut config = config.clone();
    config.validate()?;

    let transport = ReqwestTransport::new(&config).map_err(|source| JiraError::Transport {
      url: config.host.clone(),
      source,
    })?;

    Self::from_parts(&config, Arc::new(transport))
  }

  /// Create a client on top of a caller-provided transport
  pub fn with_transport(config: &JiraConfig, transport: Arc<dyn Transport>) -> Result<Self> {
    let mut config = config.clone();
    config.validate()?;
    Self::from_parts(&config, transport)
  }

  fn from_parts(config: &JiraConfig, transport: Arc<dyn Transport>) -> Result<Self> {
    let root = config.api_root();
    let api_root = Url::parse(&root).map_err(|e| JiraError::InvalidUrl {
      path: root,
      reason: e.to_string(),
    })?;

    Ok(Self {
      transport,
      api_root,
      host: config.host.clone(),
    })
  }

  /// Base URL of the instance
  pub fn host(&self) -> &str {
    &self.host
  }

  /// `{host}/rest/api/{version}/`
  pub fn api_root(&self) -> &Url {
    &self.api_root
  }

  /// Resolve a resource path against the REST root. Absolute `http(s)` URLs
  /// are used as-is.
  pub fn resolve(&self, path: &str) -> Result<Url> {
    let invalid = |e: url::ParseError| JiraError::InvalidUrl {
      path: path.to_string(),
      reason: e.to_string(),
    };

    if path.starts_with("http://") || path.starts_with("https://") {
      return Url::parse(path).map_err(invalid);
    }

    self.api_root.join(path.trim_start_matches('/')).map_err(invalid)
  }

  /// Execute a request against a resource path.
  ///
  /// For `GET` and `HEAD` the payload's top-level members become query
  /// parameters; for every other verb it is sent unchanged as the JSON body,
  /// so `null` and `[]` can clear fields on update.
  pub async fn execute(&self, path: &str, payload: Option<&Value>, method: Method) -> Result<Response> {
    let url = self.resolve(path)?;
    let mut request = TransportRequest::new(method.clone(), url);

    if let Some(payload) = payload {
      request = if is_read_verb(&method) {
        request.with_query(query_pairs(payload))
      } else {
        request.with_body(RequestBody::Json(payload.clone()))
      };
    }

    self.dispatch(request).await
  }

  /// Execute with a record as payload. Unset members are pruned.
  pub(crate) async fn execute_entity<P: Serialize>(&self, path: &str, payload: &P, method: Method) -> Result<Response> {
    let payload = mapper::to_json(payload)?;
    self.execute(path, Some(&payload), method).await
  }

  /// `GET` a path and map the body onto a record
  pub(crate) async fn get_entity<T>(&self, path: &str, payload: Option<&Value>) -> Result<T>
  where
    T: DeserializeOwned + Serialize,
  {
    self
      .execute(path, payload, Method::GET)
      .await?
      .expect_status(&[200])
      .into_entity()
  }

  /// `GET` a path and map a JSON array body onto records
  pub(crate) async fn get_entities<T>(&self, path: &str, payload: Option<&Value>) -> Result<Vec<T>>
  where
    T: DeserializeOwned + Serialize,
  {
    self
      .execute(path, payload, Method::GET)
      .await?
      .expect_status(&[200])
      .into_entities()
  }

  /// Send a prepared request and buffer the response
  pub(crate) async fn dispatch(&self, request: TransportRequest) -> Result<Response> {
    let method = request.method.clone();
    let url = request.url.clone();
    let request_body = request.body.describe();

    let raw = self.send(request).await?;
    let response = Response::from_transport(raw)
      .await
      .map_err(|source| self.failure(&method, &url, source))?;

    debug!(
      %method,
      %url,
      status = response.status().as_u16(),
      headers = ?redact_header_map(response.headers()),
      body = %response.text(),
      "Received response"
    );

    if response.status().is_client_error() || response.status().is_server_error() {
      error!(
        %method,
        %url,
        request_body = %request_body,
        status = response.status().as_u16(),
        headers = ?redact_header_map(response.headers()),
        body = %response.text(),
        "Jira request failed"
      );
    }

    Ok(response)
  }

  /// Hand a request to the transport. No response body is read.
  pub(crate) async fn send(&self, request: TransportRequest) -> Result<TransportResponse> {
    let method = request.method.clone();
    let url = request.url.clone();

    debug!(
      %method,
      %url,
      headers = ?redact_pairs(&request.headers),
      query = ?request.query,
      body = %request.body.describe(),
      "Sending request"
    );

    self
      .transport
      .send(request)
      .await
      .map_err(|source| self.failure(&method, &url, source))
  }

  fn failure(&self, method: &Method, url: &Url, source: TransportError) -> JiraError {
    if source.is_connectivity() {
      error!(
        severity = SEVERITY_CRITICAL,
        %method,
        %url,
        error = %source,
        "Could not connect to Jira"
      );
      JiraError::Unreachable {
        url: url.to_string(),
        source,
      }
    } else {
      error!(%method, %url, error = %source, "Request to Jira failed");
      JiraError::Transport {
        url: url.to_string(),
        source,
      }
    }
  }

  /// Test the Jira connection by fetching the current user
  pub async fn test_connection(&self) -> Result<bool> {
    match self.execute("myself", None, Method::GET).await {
      Ok(response) => {
        let ok = response.status().is_success();
        info!(host = %self.host, status = response.status().as_u16(), "Tested Jira connection");
        Ok(ok)
      }
      Err(e) if e.is_unreachable() => Ok(false),
      Err(e) => Err(e),
    }
  }
}

/// Create a Jira client from credentials
pub fn create_jira_client(base_url: &str, username: &str, api_token: &str) -> Result<JiraClient> {
  JiraClient::new(&JiraConfig::new(base_url, username, api_token))
}

fn is_read_verb(method: &Method) -> bool {
  *method == Method::GET || *method == Method::HEAD
}

/// Flatten a JSON object into query pairs. Arrays are comma-joined, nulls
/// and empty arrays skipped, nested objects sent as JSON text.
pub(crate) fn query_pairs(payload: &Value) -> Vec<(String, String)> {
  let Value::Object(members) = payload else {
    warn!(payload = %payload, "Ignoring non-object query payload");
    return Vec::new();
  };

  members
    .iter()
    .filter_map(|(key, value)| match value {
      Value::Null => None,
      Value::Array(items) => {
        let items: Vec<String> = items.iter().filter(|item| !item.is_null()).map(query_value).collect();
        (!items.is_empty()).then(|| (key.clone(), items.join(",")))
      }
      other => Some((key.clone(), query_value(other))),
    })
    .collect()
}

fn query_value(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    other => other.to_string(),
  }
}

fn is_sensitive(name: &str) -> bool {
  SENSITIVE_HEADERS.iter().any(|h| h.eq_ignore_ascii_case(name))
}

fn redact_pairs(headers: &[(String, String)]) -> Vec<(String, String)> {
  headers
    .iter()
    .map(|(name, value)| {
      let value = if is_sensitive(name) { REDACTED.to_string() } else { value.clone() };
      (name.clone(), value)
    })
    .collect()
}

fn redact_header_map(headers: &HeaderMap) -> Vec<(String, String)> {
  let pairs: Vec<(String, String)> = headers
    .iter()
    .map(|(name, value)| (name.to_string(), value.to_str().unwrap_or("<binary>").to_string()))
    .collect();
  redact_pairs(&pairs)
}

#[cfg(test)]
mod tests {
  use async_trait::async_trait;
  use jirest_test_utils::LogCapture;
  use serde_json::json;
  use wiremock::matchers::{body_json, header, method, path, query_param};
  use wiremock::{Mock, MockServer, ResponseTemplate};

  use super::*;

  fn client_for(server: &MockServer) -> JiraClient {
    create_jira_client(&server.uri(), "test_user", "test_token").unwrap()
  }

  struct FailingTransport(fn() -> TransportError);

  #[async_trait]
  impl Transport for FailingTransport {
    async fn send(&self, _request: TransportRequest) -> std::result::Result<TransportResponse, TransportError> {
      Err((self.0)())
    }
  }

  fn failing_client(error: fn() -> TransportError) -> JiraClient {
    let config = JiraConfig::new("https://jira.example.com", "test_user", "test_token");
    JiraClient::with_transport(&config, Arc::new(FailingTransport(error))).unwrap()
  }

  #[test]
  fn test_client_creation() {
    let client = create_jira_client("jira.example.com/", "test_user", "test_token").unwrap();
    assert_eq!(client.host(), "https://jira.example.com");
    assert_eq!(client.api_root().as_str(), "https://jira.example.com/rest/api/2/");
  }

  #[test]
  fn test_client_requires_host() {
    let err = create_jira_client("", "test_user", "test_token").unwrap_err();
    assert!(matches!(err, JiraError::Config(_)));
  }

  #[test]
  fn test_resolve_paths() {
    let client = create_jira_client("https://jira.example.com", "u", "p").unwrap();

    assert_eq!(
      client.resolve("issue/PROJ-1").unwrap().as_str(),
      "https://jira.example.com/rest/api/2/issue/PROJ-1"
    );
    assert_eq!(
      client.resolve("/field").unwrap().as_str(),
      "https://jira.example.com/rest/api/2/field"
    );
    assert_eq!(
      client
        .resolve("https://cdn.example.com/secure/attachment/1/a.txt")
        .unwrap()
        .as_str(),
      "https://cdn.example.com/secure/attachment/1/a.txt"
    );
  }

  #[test]
  fn test_query_pairs() {
    let mut pairs = query_pairs(&json!({
        "jql": "project = PROJ",
        "fields": ["summary", null, "status"],
        "maxResults": 50,
        "validate": true,
        "expand": null,
        "properties": []
    }));
    pairs.sort();

    assert_eq!(
      pairs,
      vec![
        ("fields".to_string(), "summary,status".to_string()),
        ("jql".to_string(), "project = PROJ".to_string()),
        ("maxResults".to_string(), "50".to_string()),
        ("validate".to_string(), "true".to_string()),
      ]
    );
  }

  #[test]
  fn test_redacts_sensitive_headers() {
    let headers = vec![
      ("Authorization".to_string(), "Basic abc".to_string()),
      ("X-Atlassian-Token".to_string(), "no-check".to_string()),
    ];
    assert_eq!(
      redact_pairs(&headers),
      vec![
        ("Authorization".to_string(), "<redacted>".to_string()),
        ("X-Atlassian-Token".to_string(), "no-check".to_string()),
      ]
    );
  }

  #[tokio::test]
  async fn test_get_encodes_payload_as_query() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/search"))
      .and(query_param("jql", "project = PROJ"))
      .and(query_param("fields", "summary,status"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total": 0, "issues": [] })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server);
    let payload = json!({ "jql": "project = PROJ", "fields": ["summary", "status"] });
    let response = client.execute("search", Some(&payload), Method::GET).await?;

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.json(), Some(&json!({ "total": 0, "issues": [] })));

    Ok(())
  }

  #[tokio::test]
  async fn test_put_sends_payload_unchanged() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;
    let payload = json!({ "fields": { "assignee": null, "labels": [], "summary": "" } });

    Mock::given(method("PUT"))
      .and(path("/rest/api/2/issue/PROJ-1"))
      .and(header("Content-Type", "application/json"))
      .and(body_json(payload.clone()))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server);
    let response = client.execute("issue/PROJ-1", Some(&payload), Method::PUT).await?;

    assert_eq!(response.status().as_u16(), 204);

    Ok(())
  }

  #[tokio::test]
  async fn test_entity_payload_is_pruned() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
      .and(path("/rest/api/2/issue"))
      .and(body_json(json!({ "fields": { "summary": "New issue" } })))
      .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": "10000", "key": "PROJ-1" })))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server);
    let payload = json!({ "fields": { "summary": "New issue", "labels": [], "description": null } });
    let response = client.execute_entity("issue", &payload, Method::POST).await?;

    assert_eq!(response.status().as_u16(), 201);

    Ok(())
  }

  #[tokio::test]
  async fn test_delete_encodes_payload_as_body() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("DELETE"))
      .and(path("/rest/api/2/issue/PROJ-1"))
      .and(body_json(json!({ "reason": "duplicate" })))
      .respond_with(ResponseTemplate::new(204))
      .expect(1)
      .mount(&mock_server)
      .await;

    let client = client_for(&mock_server);
    let payload = json!({ "reason": "duplicate" });
    let response = client.execute("issue/PROJ-1", Some(&payload), Method::DELETE).await?;
    assert_eq!(response.status().as_u16(), 204);

    Ok(())
  }

  #[tokio::test]
  async fn test_http_error_is_logged_and_returned() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/issue/NOPE-1"))
      .respond_with(ResponseTemplate::new(404).set_body_json(json!({
          "errorMessages": ["Issue does not exist or you do not have permission to see it."],
          "errors": {}
      })))
      .mount(&mock_server)
      .await;

    let logs = LogCapture::new();
    let _guard = logs.set_default();

    let client = client_for(&mock_server);
    let response = client.execute("issue/NOPE-1", None, Method::GET).await?;

    assert_eq!(response.status().as_u16(), 404);
    assert!(response.is_error());
    assert_eq!(
      response.server_errors(),
      vec!["Issue does not exist or you do not have permission to see it.".to_string()]
    );

    let failures = logs.lines_containing("Jira request failed");
    assert_eq!(failures.len(), 1);
    assert!(failures[0].contains("ERROR"));
    assert!(failures[0].contains("status=404"));
    assert!(failures[0].contains("Issue does not exist"));

    Ok(())
  }

  #[tokio::test]
  async fn test_connectivity_failure_is_sentinel_with_critical_log() {
    let logs = LogCapture::new();
    let _guard = logs.set_default();

    let client = failing_client(|| TransportError::Connect("dns error: no such host".to_string()));
    let err = client.execute("myself", None, Method::GET).await.unwrap_err();

    assert!(err.is_unreachable());
    let lines = logs.lines_containing("Could not connect to Jira");
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("ERROR"));
    assert!(lines[0].contains("severity=\"critical\""));
    assert!(lines[0].contains("https://jira.example.com/rest/api/2/myself"));
  }

  #[tokio::test]
  async fn test_timeout_is_sentinel() {
    let client = failing_client(|| TransportError::Timeout("operation timed out".to_string()));
    let err = client.execute("myself", None, Method::GET).await.unwrap_err();
    assert!(err.is_unreachable());
  }

  #[tokio::test]
  async fn test_other_transport_failure_is_not_sentinel() {
    let logs = LogCapture::new();
    let _guard = logs.set_default();

    let client = failing_client(|| TransportError::Other("invalid header".to_string()));
    let err = client.execute("myself", None, Method::GET).await.unwrap_err();

    assert!(matches!(err, JiraError::Transport { .. }));
    assert!(!logs.contains("critical"));
  }

  #[tokio::test]
  async fn test_refused_connection_end_to_end() {
    let client = create_jira_client("http://127.0.0.1:1", "test_user", "test_token").unwrap();
    let err = client.execute("myself", None, Method::GET).await.unwrap_err();
    assert!(err.is_unreachable(), "unexpected error: {err}");
  }

  #[tokio::test]
  async fn test_test_connection() -> anyhow::Result<()> {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
      .and(path("/rest/api/2/myself"))
      .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "name": "test_user" })))
      .mount(&mock_server)
      .await;

    assert!(client_for(&mock_server).test_connection().await?);
    assert!(
      !failing_client(|| TransportError::Connect("refused".to_string()))
        .test_connection()
        .await?
    );

    Ok(())
  }
}
