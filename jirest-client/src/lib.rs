//! # Jira REST Client
//!
//! A thin client for the Jira REST API. [`JiraClient::execute`] dispatches
//! any `(path, payload, verb)` triple and returns a [`Response`] to classify;
//! [`JiraClient::upload`] and [`JiraClient::download`] move files; the typed
//! endpoint methods map bodies onto the records in [`models`].
//!
//! An unreachable server is reported as [`JiraError::Unreachable`] after a
//! critical log entry. HTTP error statuses are logged and still parsed.

mod client;
pub mod consts;
mod download;
mod endpoints;
mod error;
pub mod mapper;
pub mod models;
mod response;
pub mod transport;
mod upload;

// Re-export the client
pub use client::{JiraClient, create_jira_client};
pub use download::Download;
pub use error::{JiraError, Result};
pub use response::Response;
pub use transport::{ByteStream, ReqwestTransport, Transport, TransportError, TransportRequest, TransportResponse};
// Re-export models
pub use models::{
  Attachment, Comment, Comments, CreatedIssue, Field, Issue, IssueFields, IssueQuery, IssueType, NewField, Project,
  SearchQuery, SearchResult, Transitions, User,
};
// The HTTP verb type accepted by `execute`
pub use reqwest::Method;
