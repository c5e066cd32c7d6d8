//! Tool catalog types and the dispatch seam.

use crate::error::ToolError;
use crate::message::{FunctionDefinition, ToolDefinition};
use std::future::Future;
use std::pin::Pin;

/// A tool discovered from a server, in a flat shape the chat API understands.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: Option<String>,
    /// JSON-schema `properties` object describing the tool's parameters.
    pub properties: serde_json::Value,
    /// Names of required parameters, in source-schema order.
    pub required: Vec<String>,
}

impl ToolDescriptor {
    /// Lower the descriptor to the function-calling wire shape.
    ///
    /// Every tool is marked strict, i.e. eligible for structured invocation.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            kind: "function".to_string(),
            function: FunctionDefinition {
                name: self.name.clone(),
                description: self.description.clone(),
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": self.properties,
                    "required": self.required,
                }),
                strict: true,
            },
        }
    }
}

/// Dispatch seam between the orchestrator and whatever executes tools.
///
/// Dyn-compatible so the orchestrator holds `Arc<dyn ToolDispatcher>` and
/// tests can substitute a recording double.
pub trait ToolDispatcher: Send + Sync {
    /// The merged catalog, in the wire shape.
    fn catalog(&self) -> Vec<ToolDefinition>;

    /// Invoke a tool by catalog name with already-parsed arguments.
    fn dispatch<'a>(
        &'a self,
        name: &'a str,
        arguments: serde_json::Value,
    ) -> Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;
}
