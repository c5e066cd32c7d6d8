//! Error types for MCP server communication.

use thiserror::Error;

/// Errors from spawning or talking to a tool server.
#[derive(Debug, Error)]
pub enum McpError {
    #[error("Failed to spawn server '{name}': {source}")]
    Spawn {
        name: String,
        source: std::io::Error,
    },

    #[error("Transport '{kind}' for server '{name}' is not supported")]
    UnsupportedTransport { name: String, kind: String },

    #[error("Server '{server}' returned JSON-RPC error {code}: {message}")]
    Rpc {
        server: String,
        code: i64,
        message: String,
    },

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Server closed the connection")]
    Closed,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
