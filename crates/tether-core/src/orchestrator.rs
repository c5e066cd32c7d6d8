//! The per-query orchestrator: one completion, an optional tool round, one
//! follow-up completion.

use std::sync::Arc;
use tether_types::{
    ChatMessage, ChatRequest, Provider, TetherError, ToolDefinition, ToolDispatcher, ToolError,
};

/// Response-length cap applied to every completion request.
const MAX_COMPLETION_TOKENS: u32 = 500;

/// Events surfaced to the caller while a query is processed.
#[derive(Debug)]
pub enum QueryEvent {
    /// A tool is about to be invoked, with its raw arguments JSON.
    ToolCall { name: String, arguments: String },
    /// A tool invocation finished.
    ToolResult { name: String },
}

/// Drives one query through the chat model and the tool gateway.
///
/// Both collaborators are injected, so tests substitute scripted doubles.
pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    tools: Arc<dyn ToolDispatcher>,
    model: String,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: Arc<dyn ToolDispatcher>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            tools,
            model: model.into(),
        }
    }

    /// Process one user query to a final answer.
    ///
    /// The first completion carries the full tool catalog. If the reply
    /// requests tool calls, each is executed in order and answered with a
    /// correlated tool message; the follow-up completion then carries no
    /// catalog, so the model cannot open another round.
    pub async fn process_query<F>(&self, text: &str, mut on_event: F) -> Result<String, TetherError>
    where
        F: FnMut(QueryEvent),
    {
        let mut messages = vec![ChatMessage::user(text)];

        let catalog = self.tools.catalog();
        let catalog = if catalog.is_empty() { None } else { Some(catalog) };

        let first = self
            .provider
            .complete(&self.request(&messages, catalog))
            .await?;
        let reply = first.message()?.clone();

        let tool_calls = reply.tool_calls.clone().unwrap_or_default();
        if tool_calls.is_empty() {
            return Ok(reply.text().to_string());
        }

        messages.push(reply);

        for call in &tool_calls {
            let name = &call.function.name;
            let arguments: serde_json::Value = serde_json::from_str(&call.function.arguments)
                .map_err(|e| ToolError::ArgumentParse {
                    tool: name.clone(),
                    message: e.to_string(),
                })?;
            if !arguments.is_object() {
                return Err(ToolError::ArgumentParse {
                    tool: name.clone(),
                    message: "arguments did not decode to an object".into(),
                }
                .into());
            }

            tracing::info!("executing tool {name} with {}", call.function.arguments);
            on_event(QueryEvent::ToolCall {
                name: name.clone(),
                arguments: call.function.arguments.clone(),
            });

            let result = self.tools.dispatch(name, arguments).await?;
            on_event(QueryEvent::ToolResult { name: name.clone() });

            messages.push(ChatMessage::tool(call.id.clone(), result));
        }

        let second = self.provider.complete(&self.request(&messages, None)).await?;
        Ok(second.message()?.text().to_string())
    }

    fn request(&self, messages: &[ChatMessage], tools: Option<Vec<ToolDefinition>>) -> ChatRequest {
        ChatRequest {
            model: self.model.clone(),
            max_tokens: MAX_COMPLETION_TOKENS,
            messages: messages.to_vec(),
            tools,
            stop: None,
        }
    }
}
