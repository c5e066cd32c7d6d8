//! MCP tool server plumbing for tether.
//!
//! Each configured server is spawned as a child process speaking
//! newline-delimited JSON-RPC 2.0 over stdio, taken through the MCP
//! handshake, and its tools merged into the session catalog. The gateway
//! routes every call to the server that registered the tool.

pub mod client;
pub mod config;
pub mod error;
pub mod gateway;
pub mod rpc;
mod transport;

pub use client::{ServerClient, ToolResult};
pub use config::{ServerConfig, ServersFile, TransportKind};
pub use error::McpError;
pub use gateway::ToolGateway;
