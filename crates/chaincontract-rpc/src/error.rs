//! Transport-level error types.

use thiserror::Error;

use crate::request::JsonRpcError;

/// Errors that can occur while talking to the node.
///
/// None of these are retried by the contract engine; callers that want
/// backoff wrap their transport.
#[derive(Debug, Error)]
pub enum TransportError {
    /// HTTP request failed (connection refused, non-JSON error page, ...).
    #[error("HTTP error: {0}")]
    Http(String),

    /// JSON-RPC protocol-level error returned by the node.
    #[error("RPC error {}: {}", .0.code, .0.message)]
    Rpc(JsonRpcError),

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    /// Response could not be deserialized into the expected shape.
    #[error("Deserialization error: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The node answered with something structurally unexpected.
    #[error("Malformed response to '{method}': {reason}")]
    MalformedResponse { method: String, reason: String },

    /// An unexpected error.
    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// Returns `true` if the failure happened before the node processed the
    /// request (connection level). Useful for callers layering retries.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Timeout { .. })
    }

    /// Returns `true` if the node itself rejected the request.
    pub fn is_node_error(&self) -> bool {
        matches!(self, Self::Rpc(_))
    }

    /// The node's JSON-RPC error code, if this is a node-side error.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc(err) => Some(err.code),
            _ => None,
        }
    }
}
