//! Per-server MCP client: handshake, tool discovery, invocation.

use crate::config::{ServerConfig, TransportKind};
use crate::error::McpError;
use crate::rpc::Response;
use crate::transport::StdioTransport;
use serde::Deserialize;
use tether_types::ToolDescriptor;

/// MCP protocol revision spoken by this client.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// A connected tool server.
pub struct ServerClient {
    name: String,
    transport: StdioTransport,
    tools: Vec<ToolDescriptor>,
}

/// Flattened outcome of one `tools/call`.
#[derive(Debug, Clone)]
pub struct ToolResult {
    pub text: String,
    pub is_error: bool,
}

#[derive(Deserialize)]
struct ListToolsResult {
    tools: Vec<ToolEntry>,
}

#[derive(Deserialize)]
struct ToolEntry {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "inputSchema")]
    input_schema: SchemaObject,
}

/// The subset of a JSON-schema object the catalog carries forward.
#[derive(Default, Deserialize)]
struct SchemaObject {
    #[serde(default)]
    properties: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    required: Vec<String>,
}

#[derive(Deserialize)]
struct CallToolResult {
    #[serde(default)]
    content: Vec<ContentItem>,
    #[serde(default, rename = "isError")]
    is_error: bool,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum ContentItem {
    Text {
        text: String,
    },
    Image {
        #[serde(rename = "mimeType")]
        mime_type: String,
    },
}

impl ServerClient {
    /// Connect to a tool server: spawn, handshake, discover tools.
    ///
    /// Only the stdio transport is implemented; `sse` entries are rejected.
    pub async fn connect(name: impl Into<String>, config: &ServerConfig) -> Result<Self, McpError> {
        let name = name.into();

        if config.transport != TransportKind::Stdio {
            return Err(McpError::UnsupportedTransport {
                kind: config.transport.to_string(),
                name,
            });
        }

        let mut transport = StdioTransport::spawn(&name, config)?;

        let init = transport
            .request(
                "initialize",
                Some(serde_json::json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {},
                    "clientInfo": {
                        "name": "tether",
                        "version": env!("CARGO_PKG_VERSION"),
                    },
                })),
            )
            .await?;
        expect_result(&name, init)?;

        transport.notify("notifications/initialized", None).await?;

        let listed = transport.request("tools/list", None).await?;
        let result = expect_result(&name, listed)?;
        let listed: ListToolsResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("bad tools/list response: {e}")))?;
        let tools: Vec<ToolDescriptor> = listed.tools.into_iter().map(translate).collect();

        tracing::info!("server '{}' connected with {} tools", name, tools.len());

        Ok(Self {
            name,
            transport,
            tools,
        })
    }

    /// Call a tool on this server with already-parsed arguments.
    pub async fn call_tool(
        &mut self,
        tool: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolResult, McpError> {
        let response = self
            .transport
            .request(
                "tools/call",
                Some(serde_json::json!({
                    "name": tool,
                    "arguments": arguments,
                })),
            )
            .await?;
        let result = expect_result(&self.name, response)?;

        let call: CallToolResult = serde_json::from_value(result)
            .map_err(|e| McpError::Protocol(format!("bad tools/call result: {e}")))?;

        Ok(ToolResult {
            text: flatten(call.content),
            is_error: call.is_error,
        })
    }

    /// Tools discovered at connect time.
    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn server_name(&self) -> &str {
        &self.name
    }

    /// Tear down the connection and the child process.
    pub async fn shutdown(self) {
        self.transport.shutdown().await;
    }
}

/// Unwrap a response into its result, or surface the server's error.
fn expect_result(server: &str, response: Response) -> Result<serde_json::Value, McpError> {
    if let Some(error) = response.error {
        return Err(McpError::Rpc {
            server: server.to_string(),
            code: error.code,
            message: error.message,
        });
    }
    response.result.ok_or_else(|| {
        McpError::Protocol(format!("response from '{server}' has neither result nor error"))
    })
}

fn translate(entry: ToolEntry) -> ToolDescriptor {
    ToolDescriptor {
        name: entry.name,
        description: entry.description,
        properties: serde_json::Value::Object(entry.input_schema.properties),
        required: entry.input_schema.required,
    }
}

/// Join a content list into one text block for the conversation.
fn flatten(content: Vec<ContentItem>) -> String {
    content
        .into_iter()
        .map(|item| match item {
            ContentItem::Text { text } => text,
            ContentItem::Image { mime_type } => format!("[image {mime_type}]"),
        })
        .collect::<Vec<_>>()
        .join("\n")
}
