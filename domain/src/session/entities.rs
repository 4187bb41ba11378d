//! Session domain entities

use crate::tool::entities::ToolCall;
use crate::tool::value_objects::{ToolOutcome, ToolResult};
use serde::{Deserialize, Serialize};

/// Role of a message in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
    /// Result of a tool call, correlated by call id
    Tool,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Message body: plain text or a structured payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Structured(serde_json::Value),
}

impl MessageContent {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            MessageContent::Text(s) => Some(s),
            MessageContent::Structured(_) => None,
        }
    }

    /// Render the content as a string (structured payloads as compact JSON)
    pub fn to_text(&self) -> String {
        match self {
            MessageContent::Text(s) => s.clone(),
            MessageContent::Structured(v) => v.to_string(),
        }
    }
}

/// A message in a conversation (Entity)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: MessageContent,
    /// Tool calls requested by the model (assistant messages only)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Originating call id (tool-result messages only)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_id: Option<String>,
    /// Whether a tool-result message carries an error
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl Message {
    fn text(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: MessageContent::Text(content.into()),
            tool_calls: Vec::new(),
            call_id: None,
            is_error: false,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::text(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::text(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::text(Role::Assistant, content)
    }

    /// Assistant message that requests tool calls
    pub fn assistant_with_tool_calls(content: impl Into<String>, calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls: calls,
            ..Self::text(Role::Assistant, content)
        }
    }

    /// Tool-result message for a finished tool call.
    ///
    /// Success payloads are carried as-is; failures become
    /// `{"error": {"code", "message", "details"?}}` so the model can read them.
    pub fn tool_result(result: &ToolResult) -> Self {
        let (content, is_error) = match &result.outcome {
            ToolOutcome::Payload(payload) => (payload.clone(), false),
            ToolOutcome::Error(error) => {
                let mut body = serde_json::json!({
                    "code": error.kind.code(),
                    "message": error.message,
                });
                if let Some(details) = &error.details {
                    body["details"] = serde_json::Value::String(details.clone());
                }
                (serde_json::json!({ "error": body }), true)
            }
        };

        Self {
            role: Role::Tool,
            content: MessageContent::Structured(content),
            tool_calls: Vec::new(),
            call_id: Some(result.call_id.clone()),
            is_error,
        }
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::value_objects::ToolError;
    use serde_json::json;

    #[test]
    fn test_text_constructors() {
        assert_eq!(Message::system("be brief").role, Role::System);
        assert_eq!(Message::user("hi").content.as_text(), Some("hi"));
        let reply = Message::assistant("hello");
        assert_eq!(reply.role, Role::Assistant);
        assert!(!reply.has_tool_calls());
    }

    #[test]
    fn test_assistant_with_tool_calls() {
        let msg = Message::assistant_with_tool_calls(
            "",
            vec![ToolCall::new("c1", "lookup_balance").with_arg("account_id", "A1")],
        );
        assert!(msg.has_tool_calls());
        assert_eq!(msg.tool_calls[0].id, "c1");
    }

    #[test]
    fn test_tool_result_success_message() {
        let result = ToolResult::success("c1", "lookup_balance", json!({"balance": 42}));
        let msg = Message::tool_result(&result);

        assert_eq!(msg.role, Role::Tool);
        assert_eq!(msg.call_id.as_deref(), Some("c1"));
        assert_eq!(msg.content, MessageContent::Structured(json!({"balance": 42})));
        assert!(!msg.is_error);
    }

    #[test]
    fn test_tool_result_error_message() {
        let result = ToolResult::failure("c9", "ghost", ToolError::not_found("ghost"));
        let msg = Message::tool_result(&result);

        assert!(msg.is_error);
        assert_eq!(
            msg.content,
            MessageContent::Structured(json!({
                "error": {"code": "NOT_FOUND", "message": "Tool not found: ghost"}
            }))
        );
    }

    #[test]
    fn test_message_serialization_skips_empty_fields() {
        let value = serde_json::to_value(Message::user("hi")).unwrap();
        assert_eq!(value, json!({"role": "user", "content": "hi"}));
    }
}
