//! # HTTP Transport
//!
//! The seam between the client and the network. [`JiraClient`] only speaks
//! [`TransportRequest`]/[`TransportResponse`], so tests and embedders can swap
//! in their own [`Transport`]; [`ReqwestTransport`] is the production one.
//!
//! [`JiraClient`]: crate::JiraClient

use std::time::Duration;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::{StreamExt, TryStreamExt};
use jirest_core::{JiraAuth, JiraConfig};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Method, Proxy, StatusCode};
use serde_json::Value;
use thiserror::Error;
use url::Url;

/// Response body delivered chunk by chunk
pub type ByteStream = BoxStream<'static, Result<Vec<u8>, TransportError>>;

/// Failures raised by a transport before an HTTP response is available
#[derive(Debug, Error)]
pub enum TransportError {
  /// DNS failure, refused or reset connection
  #[error("connection failed: {0}")]
  Connect(String),

  /// The configured request timeout elapsed
  #[error("request timed out: {0}")]
  Timeout(String),

  /// The transport itself could not be set up
  #[error("transport setup failed: {0}")]
  Setup(String),

  /// Anything else: malformed request, body read failure, protocol errors
  #[error("request failed: {0}")]
  Other(String),
}

impl TransportError {
  /// Whether the server could not be reached at all
  pub const fn is_connectivity(&self) -> bool {
    matches!(self, TransportError::Connect(_) | TransportError::Timeout(_))
  }
}

impl From<reqwest::Error> for TransportError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_timeout() {
      TransportError::Timeout(err.to_string())
    } else if err.is_connect() {
      TransportError::Connect(err.to_string())
    } else if err.is_builder() {
      TransportError::Setup(err.to_string())
    } else {
      TransportError::Other(err.to_string())
    }
  }
}

/// A file sent as one multipart form part
#[derive(Debug, Clone)]
pub struct FilePart {
  pub field: String,
  pub file_name: String,
  pub content: Vec<u8>,
}

/// Request payload
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
  #[default]
  Empty,
  Json(Value),
  Multipart(FilePart),
}

impl RequestBody {
  /// Short rendering for logs
  pub fn describe(&self) -> String {
    match self {
      RequestBody::Empty => String::new(),
      RequestBody::Json(value) => value.to_string(),
      RequestBody::Multipart(part) => format!(
        "multipart {}='{}' ({} bytes)",
        part.field,
        part.file_name,
        part.content.len()
      ),
    }
  }
}

/// Everything a transport needs to dispatch one call
#[derive(Debug, Clone)]
pub struct TransportRequest {
  pub method: Method,
  pub url: Url,
  pub headers: Vec<(String, String)>,
  pub query: Vec<(String, String)>,
  pub body: RequestBody,
}

impl TransportRequest {
  pub fn new(method: Method, url: Url) -> Self {
    Self {
      method,
      url,
      headers: Vec::new(),
      query: Vec::new(),
      body: RequestBody::Empty,
    }
  }

  pub fn with_header(mut self, name: &str, value: &str) -> Self {
    self.headers.push((name.to_string(), value.to_string()));
    self
  }

  pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
    self.query = query;
    self
  }

  pub fn with_body(mut self, body: RequestBody) -> Self {
    self.body = body;
    self
  }
}

/// Status line, headers and a streaming body
pub struct TransportResponse {
  pub status: StatusCode,
  pub headers: HeaderMap,
  pub body: ByteStream,
}

impl std::fmt::Debug for TransportResponse {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TransportResponse")
      .field("status", &self.status)
      .field("headers", &self.headers)
      .finish_non_exhaustive()
  }
}

impl TransportResponse {
  /// Build a response around an in-memory body
  pub fn from_bytes(status: StatusCode, headers: HeaderMap, body: Vec<u8>) -> Self {
    Self {
      status,
      headers,
      body: futures::stream::once(async move { Ok(body) }).boxed(),
    }
  }

  /// Drain the body into memory
  pub async fn bytes(self) -> Result<Vec<u8>, TransportError> {
    self
      .body
      .try_fold(Vec::new(), |mut acc, chunk| async move {
        acc.extend_from_slice(&chunk);
        Ok(acc)
      })
      .await
  }
}

/// Performs HTTP exchanges on behalf of the client
#[async_trait]
pub trait Transport: Send + Sync {
  /// Dispatch a request. An `Err` means no HTTP response was obtained; error
  /// statuses are returned as `Ok` responses.
  async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// [`Transport`] backed by a shared `reqwest` client
pub struct ReqwestTransport {
  client: Client,
  auth: JiraAuth,
}

impl ReqwestTransport {
  /// Build a transport from the configured timeout, TLS, proxy, user agent
  /// and credentials
  pub fn new(config: &JiraConfig) -> Result<Self, TransportError> {
    let mut default_headers = HeaderMap::new();
    default_headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

    let mut builder = Client::builder()
      .user_agent(config.user_agent.clone())
      .default_headers(default_headers)
      .timeout(Duration::from_secs(config.timeout_secs))
      .danger_accept_invalid_certs(!config.verify_tls);

    if let Some(proxy) = &config.proxy {
      let mut reqwest_proxy = Proxy::all(proxy.url.as_str())?;
      if let Some(username) = &proxy.username {
        reqwest_proxy = reqwest_proxy.basic_auth(username, proxy.password.as_deref().unwrap_or_default());
      }
      builder = builder.proxy(reqwest_proxy);
    }

    Ok(Self {
      client: builder.build()?,
      auth: config.auth(),
    })
  }

  fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
    match &self.auth {
      JiraAuth::Basic { username, password } => builder.basic_auth(username, Some(password)),
      JiraAuth::Bearer { token } => builder.bearer_auth(token),
      JiraAuth::Anonymous => builder,
    }
  }
}

#[async_trait]
impl Transport for ReqwestTransport {
  async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
    let mut builder = self.client.request(request.method, request.url);

    for (name, value) in &request.headers {
      builder = builder.header(name.as_str(), value.as_str());
    }
    if !request.query.is_empty() {
      builder = builder.query(&request.query);
    }
    builder = self.authorize(builder);

    builder = match request.body {
      RequestBody::Empty => builder,
      RequestBody::Json(value) => builder.json(&value),
      RequestBody::Multipart(part) => {
        let file = Part::bytes(part.content).file_name(part.file_name);
        builder.multipart(Form::new().part(part.field, file))
      }
    };

    let response = builder.send().await?;
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
      .bytes_stream()
      .map(|chunk| chunk.map(|bytes| bytes.to_vec()).map_err(TransportError::from))
      .boxed();

    Ok(TransportResponse { status, headers, body })
  }
}
