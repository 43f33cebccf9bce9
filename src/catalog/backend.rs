use std::fmt;

use async_trait::async_trait;

use super::types::{CatalogItem, CollectionKind, FetchParams, InquiryPayload};

/// Errors that can occur while talking to the catalog backend.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendError {
    /// Backend misconfigured (bad base URL, client build failure).
    Config(String),
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// Non-2xx response. `message` is the server's human-readable `message`
    /// field, when the body carried one.
    Api { status: u16, message: Option<String> },
    /// Response body was not the expected shape.
    Parse(String),
}

impl BackendError {
    /// The server-supplied message, if any. Only API errors carry one.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            BackendError::Api {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Config(msg) => write!(f, "config error: {msg}"),
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => match message {
                Some(message) => write!(f, "API error (HTTP {status}): {message}"),
                None => write!(f, "API error (HTTP {status})"),
            },
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The remote side of the catalog: collection reads and inquiry writes.
///
/// Implementations are stateless request/response wrappers. Ordering,
/// staleness and retries are the caller's concern.
#[async_trait]
pub trait CatalogBackend: Send + Sync {
    /// Returns the name of the backend (for logs).
    fn name(&self) -> &str;

    /// Fetches one collection. Items come back in server order, unfiltered.
    async fn fetch_collection(
        &self,
        kind: CollectionKind,
        params: &FetchParams,
    ) -> Result<Vec<CatalogItem>, BackendError>;

    /// Sends one inquiry. Exactly one request per call; never retried here.
    async fn submit_inquiry(&self, payload: &InquiryPayload) -> Result<(), BackendError>;
}
