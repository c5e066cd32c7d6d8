//! Tool gateway: owns every server connection and routes calls by name.

use crate::client::ServerClient;
use crate::config::ServersFile;
use crate::error::McpError;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use tether_types::{ToolDefinition, ToolDescriptor, ToolDispatcher, ToolError};
use tokio::sync::Mutex;

/// All connected servers, their merged catalog, and a name→server route table.
///
/// Read-only after startup apart from the per-server locks, which serialize
/// the one-outstanding-call-at-a-time traffic.
pub struct ToolGateway {
    clients: Vec<Mutex<ServerClient>>,
    catalog: Vec<ToolDescriptor>,
    routes: HashMap<String, usize>,
}

impl ToolGateway {
    /// Connect every configured server, in registry iteration order.
    ///
    /// Startup is all-or-nothing: the first failure aborts. Children already
    /// spawned are reaped by kill-on-drop.
    pub async fn connect_all(registry: &ServersFile) -> Result<Self, McpError> {
        let mut gateway = Self {
            clients: Vec::new(),
            catalog: Vec::new(),
            routes: HashMap::new(),
        };

        for (name, config) in &registry.servers {
            let client = match ServerClient::connect(name.clone(), config).await {
                Ok(client) => client,
                Err(e) => {
                    tracing::error!("failed to connect server '{name}': {e}");
                    return Err(e);
                }
            };

            let index = gateway.clients.len();
            for descriptor in client.tools() {
                if gateway.routes.contains_key(&descriptor.name) {
                    tracing::warn!(
                        "tool '{}' from server '{name}' shadows an earlier registration; dropped",
                        descriptor.name
                    );
                    continue;
                }
                gateway.routes.insert(descriptor.name.clone(), index);
                gateway.catalog.push(descriptor.clone());
            }
            gateway.clients.push(Mutex::new(client));
        }

        Ok(gateway)
    }

    pub fn server_count(&self) -> usize {
        self.clients.len()
    }

    pub fn tool_count(&self) -> usize {
        self.catalog.len()
    }

    /// Call a tool on whichever server registered it.
    pub async fn call(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<String, ToolError> {
        let index = *self.routes.get(name).ok_or_else(|| ToolError::Unknown {
            name: name.to_string(),
        })?;

        let mut client = self.clients[index].lock().await;
        let result = client
            .call_tool(name, arguments)
            .await
            .map_err(|e| ToolError::Invocation {
                tool: name.to_string(),
                message: e.to_string(),
            })?;

        // An isError result is still content for the model to read; only
        // transport-level failures abort the query.
        if result.is_error {
            Ok(format!("Tool reported an error: {}", result.text))
        } else {
            Ok(result.text)
        }
    }

    /// Tear down every connection, best-effort.
    ///
    /// Consuming `self` makes a second cleanup pass unrepresentable.
    pub async fn shutdown(self) {
        for client in self.clients {
            client.into_inner().shutdown().await;
        }
    }
}

impl ToolDispatcher for ToolGateway {
    fn catalog(&self) -> Vec<ToolDefinition> {
        self.catalog.iter().map(ToolDescriptor::to_definition).collect()
    }

    fn dispatch<'a>(
        &'a self,
        name: &'a str,
        arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>> {
        Box::pin(self.call(name, arguments))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn empty_registry_connects_nothing() {
        let gateway = ToolGateway::connect_all(&ServersFile::default())
            .await
            .unwrap();
        assert_eq!(gateway.server_count(), 0);
        assert_eq!(gateway.tool_count(), 0);
        assert!(gateway.catalog().is_empty());
        gateway.shutdown().await;
    }

    #[tokio::test]
    async fn unknown_tool_is_an_explicit_error() {
        let gateway = ToolGateway::connect_all(&ServersFile::default())
            .await
            .unwrap();
        match gateway.call("missing", serde_json::json!({})).await {
            Err(ToolError::Unknown { name }) => assert_eq!(name, "missing"),
            other => panic!("expected Unknown, got {other:?}"),
        }
        gateway.shutdown().await;
    }

    #[tokio::test]
    async fn failed_server_aborts_startup() {
        let toml_str = r#"
[servers.bad]
command = "command_that_does_not_exist_0x9"
"#;
        let registry: ServersFile = toml::from_str(toml_str).unwrap();
        let result = ToolGateway::connect_all(&registry).await;
        assert!(matches!(result, Err(McpError::Spawn { .. })));
    }

    #[tokio::test]
    async fn sse_server_aborts_startup() {
        let toml_str = r#"
[servers.remote]
transport = "sse"
command = "irrelevant"
"#;
        let registry: ServersFile = toml::from_str(toml_str).unwrap();
        let result = ToolGateway::connect_all(&registry).await;
        assert!(matches!(
            result,
            Err(McpError::UnsupportedTransport { .. })
        ));
    }
}
