// Transport capability consumed by the store

use crate::models::TaskId;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Collection resource path
pub const TASKS_PATH: &str = "/tasks/";

/// Per-task resource path; the id is percent-encoded as one path segment
pub fn task_path(id: &TaskId) -> String {
    format!("/tasks/{}", urlencoding::encode(&id.to_string()))
}

/// Failures surfaced by an [`HttpClient`]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum HttpError {
    /// No response was received
    #[error("transport failure: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status
    #[error("server returned {status}: {body}")]
    Status { status: u16, body: String },
    /// A 2xx response whose body could not be read as JSON
    #[error("invalid response body: {0}")]
    Decode(String),
}

/// JSON-over-HTTP transport
///
/// Paths are relative to whatever base the implementation is configured
/// with. Response bodies are returned as raw JSON; interpreting them is the
/// caller's job.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn get(&self, path: &str) -> Result<Value, HttpError>;

    async fn post(&self, path: &str, body: &Value) -> Result<Value, HttpError>;

    async fn put(&self, path: &str, body: &Value) -> Result<Value, HttpError>;

    async fn delete(&self, path: &str) -> Result<(), HttpError>;
}
