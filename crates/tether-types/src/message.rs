//! Wire types for the OpenAI-compatible chat completions API.

use serde::{Deserialize, Serialize};

/// Role of a chat participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
    Tool,
}

/// A single message in a conversation.
///
/// Assistant messages may carry tool calls; tool messages carry the id of
/// the call that produced them, linking result to request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    /// A plain user message.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// A plain assistant message.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(text.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// A tool-result message correlated to the call that produced it.
    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: Role::Tool,
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }

    /// Text content, or empty for tool-call-only assistant turns.
    pub fn text(&self) -> &str {
        self.content.as_deref().unwrap_or("")
    }
}

/// A model-issued request to invoke one catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    #[serde(rename = "type")]
    pub call_type: String,
    pub function: FunctionCall,
}

/// The function half of a tool call: a name and raw JSON arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// Arguments as a JSON-encoded string, exactly as the API returned them.
    pub arguments: String,
}

/// A catalog entry in the shape the completions API expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionDefinition,
}

/// The function body of a catalog entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDefinition {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub parameters: serde_json::Value,
    pub strict: bool,
}

/// A request to the chat completions endpoint.
///
/// `stop` carries no skip attribute: a request without stop sequences
/// serializes an explicit `"stop": null`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub max_tokens: u32,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tools: Option<Vec<ToolDefinition>>,
    pub stop: Option<Vec<String>>,
}

/// A response from the chat completions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    pub model: String,
    pub choices: Vec<Choice>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// The assistant message of the first choice.
    pub fn message(&self) -> Result<&ChatMessage, crate::ApiError> {
        self.choices
            .first()
            .map(|c| &c.message)
            .ok_or_else(|| crate::ApiError::MalformedResponse("response has no choices".into()))
    }
}

/// One completion choice.
#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub index: u32,
    pub message: ChatMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token accounting from a response.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_serializes_without_tool_fields() {
        let json = serde_json::to_value(ChatMessage::user("hello")).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
    }

    #[test]
    fn tool_message_carries_correlation_id() {
        let json = serde_json::to_value(ChatMessage::tool("call_9", "42 degrees")).unwrap();
        assert_eq!(json["role"], "tool");
        assert_eq!(json["tool_call_id"], "call_9");
        assert_eq!(json["content"], "42 degrees");
    }

    #[test]
    fn request_serializes_explicit_null_stop() {
        let request = ChatRequest {
            model: "m".into(),
            max_tokens: 500,
            messages: vec![ChatMessage::user("hi")],
            tools: None,
            stop: None,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert!(json.as_object().unwrap().contains_key("stop"));
        assert!(json["stop"].is_null());
        // Absent tool catalog is omitted entirely, not serialized as null.
        assert!(json.get("tools").is_none());
    }

    #[test]
    fn deserialize_response_with_tool_calls() {
        let json = r#"{
            "id": "chatcmpl-1",
            "model": "llama-3.3-70b-versatile",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "call_abc",
                        "type": "function",
                        "function": {"name": "echo", "arguments": "{\"msg\":\"hi\"}"}
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": {"prompt_tokens": 12, "completion_tokens": 7, "total_tokens": 19}
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        let message = response.message().unwrap();
        assert_eq!(message.role, Role::Assistant);
        assert_eq!(message.text(), "");
        let calls = message.tool_calls.as_ref().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].function.name, "echo");
        assert_eq!(calls[0].function.arguments, r#"{"msg":"hi"}"#);
        assert_eq!(response.usage.unwrap().total_tokens, 19);
    }

    #[test]
    fn deserialize_response_without_usage() {
        let json = r#"{
            "id": "chatcmpl-2",
            "model": "m",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}}]
        }"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.message().unwrap().text(), "ok");
        assert!(response.usage.is_none());
    }

    #[test]
    fn empty_choices_is_a_malformed_response() {
        let json = r#"{"id": "chatcmpl-3", "model": "m", "choices": []}"#;
        let response: ChatResponse = serde_json::from_str(json).unwrap();
        assert!(response.message().is_err());
    }

    #[test]
    fn conversation_roundtrip_preserves_roles() {
        let messages = vec![
            ChatMessage::user("what is the weather"),
            ChatMessage {
                role: Role::Assistant,
                content: None,
                tool_calls: Some(vec![ToolCall {
                    id: "call_1".into(),
                    call_type: "function".into(),
                    function: FunctionCall {
                        name: "weather".into(),
                        arguments: r#"{"city":"Oslo"}"#.into(),
                    },
                }]),
                tool_call_id: None,
            },
            ChatMessage::tool("call_1", "rainy"),
        ];
        let json = serde_json::to_string(&messages).unwrap();
        let back: Vec<ChatMessage> = serde_json::from_str(&json).unwrap();
        assert_eq!(back[0].role, Role::User);
        assert_eq!(back[1].role, Role::Assistant);
        assert_eq!(back[2].role, Role::Tool);
        assert_eq!(back[2].tool_call_id.as_deref(), Some("call_1"));
    }
}
