//! Client error types

use boxcache_core::{CacheError, ResponsePath};
use thiserror::Error;

/// Failure reaching the server
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was dropped
    #[error("connection failed: {0}")]
    Connection(String),

    /// Server did not answer in time
    #[error("request timed out")]
    Timeout,

    /// Server answered with a non-success status
    #[error("server responded with status {0}")]
    Status(u16),

    /// Body could not be understood as a result
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// An error entry reported by the server next to (or instead of) data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphqlError {
    /// Human-readable message
    pub message: String,
    /// Result position the error belongs to, if reported
    pub path: Option<ResponsePath>,
}

impl GraphqlError {
    /// Error without a path
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
        }
    }

    /// Attach a result path (builder pattern)
    pub fn at(mut self, path: ResponsePath) -> Self {
        self.path = Some(path);
        self
    }
}

impl std::fmt::Display for GraphqlError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) if !path.is_root() => write!(f, "{} (at '{}')", self.message, path),
            _ => f.write_str(&self.message),
        }
    }
}

/// Errors surfaced by client operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Request never produced a result
    #[error("network error: {0}")]
    Network(#[from] TransportError),

    /// Server rejected the operation
    #[error("server error: {}", join_messages(.0))]
    Graphql(Vec<GraphqlError>),

    /// Cache could not answer a cache-only read
    #[error(transparent)]
    Cache(#[from] CacheError),
}

impl ClientError {
    /// Check if retrying the request could help
    pub fn is_network(&self) -> bool {
        matches!(self, ClientError::Network(_))
    }
}

fn join_messages(errors: &[GraphqlError]) -> String {
    if errors.is_empty() {
        return "no data".to_string();
    }
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
