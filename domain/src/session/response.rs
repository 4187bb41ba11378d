//! Model response types.
//!
//! A model turn is a sequence of content blocks mixing text and tool use
//! requests. A response with no `ToolUse` block is a final answer.

use crate::tool::entities::ToolCall;
use serde::{Deserialize, Serialize};

/// A single block of content within a model response.
///
/// # Examples
///
/// ```
/// use relay_domain::session::response::ContentBlock;
///
/// let text = ContentBlock::text("Let me check that account.");
/// assert!(text.as_text().is_some());
///
/// let tool = ContentBlock::ToolUse {
///     id: "c1".to_string(),
///     name: "lookup_balance".to_string(),
///     input: serde_json::json!({"account_id": "A1"}),
/// };
/// assert!(tool.as_tool_use().is_some());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentBlock {
    Text { text: String },

    /// A tool use request from the model.
    ToolUse {
        /// Model-assigned id, unique within the round
        id: String,
        /// Requested tool name (not yet checked against the registry)
        name: String,
        /// Raw, unvalidated arguments. May be an object, `null`, or a
        /// JSON-encoded string depending on the backend.
        input: serde_json::Value,
    },
}

impl ContentBlock {
    pub fn text(text: impl Into<String>) -> Self {
        ContentBlock::Text { text: text.into() }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ContentBlock::Text { text } => Some(text),
            _ => None,
        }
    }

    /// Returns `(id, name, input)` if this is a `ToolUse` block.
    pub fn as_tool_use(&self) -> Option<(&str, &str, &serde_json::Value)> {
        match self {
            ContentBlock::ToolUse { id, name, input } => Some((id, name, input)),
            _ => None,
        }
    }
}

/// Reason the model stopped generating.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndTurn,
    /// The model wants tools executed before it continues.
    ToolUse,
    /// Hit the token limit; the response may be truncated.
    MaxTokens,
    /// Backend-specific stop reason.
    Other(String),
}

impl StopReason {
    /// Map a chat-completions `finish_reason` string
    pub fn from_finish_reason(reason: &str) -> Self {
        match reason {
            "stop" | "end_turn" => StopReason::EndTurn,
            "tool_calls" | "tool_use" | "function_call" => StopReason::ToolUse,
            "length" | "max_tokens" => StopReason::MaxTokens,
            other => StopReason::Other(other.to_string()),
        }
    }
}

/// A structured response from the model backend.
///
/// ```
/// use relay_domain::session::response::{ContentBlock, LlmResponse, StopReason};
///
/// let response = LlmResponse {
///     content: vec![
///         ContentBlock::text("Checking..."),
///         ContentBlock::ToolUse {
///             id: "c1".to_string(),
///             name: "lookup_balance".to_string(),
///             input: serde_json::json!({"account_id": "A1"}),
///         },
///     ],
///     stop_reason: Some(StopReason::ToolUse),
///     model: None,
/// };
/// assert!(response.has_tool_calls());
/// assert_eq!(response.tool_calls()[0].id, "c1");
/// assert_eq!(response.text_content(), "Checking...");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: Vec<ContentBlock>,
    pub stop_reason: Option<StopReason>,
    pub model: Option<String>,
}

impl LlmResponse {
    /// Text-only response (final answer)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            content: vec![ContentBlock::text(text)],
            stop_reason: Some(StopReason::EndTurn),
            model: None,
        }
    }

    /// Concatenate all text blocks
    pub fn text_content(&self) -> String {
        self.content
            .iter()
            .filter_map(|b| b.as_text())
            .collect::<Vec<_>>()
            .join("")
    }

    /// Tool use blocks as `ToolCall`s, in the order the model emitted them
    pub fn tool_calls(&self) -> Vec<ToolCall> {
        self.content
            .iter()
            .filter_map(|b| match b {
                ContentBlock::ToolUse { id, name, input } => {
                    Some(ToolCall::new(id.as_str(), name.as_str()).with_arguments(input.clone()))
                }
                _ => None,
            })
            .collect()
    }

    pub fn has_tool_calls(&self) -> bool {
        self.content
            .iter()
            .any(|b| matches!(b, ContentBlock::ToolUse { .. }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn from_text_creates_final_answer() {
        let response = LlmResponse::from_text("Your balance is 42.");
        assert_eq!(response.text_content(), "Your balance is 42.");
        assert!(!response.has_tool_calls());
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.stop_reason, Some(StopReason::EndTurn));
    }

    #[test]
    fn tool_calls_keep_emission_order_and_raw_input() {
        let response = LlmResponse {
            content: vec![
                ContentBlock::text("Two lookups."),
                ContentBlock::ToolUse {
                    id: "c1".to_string(),
                    name: "slowTool".to_string(),
                    input: json!(null),
                },
                ContentBlock::ToolUse {
                    id: "c2".to_string(),
                    name: "fastTool".to_string(),
                    input: json!("{\"n\": 1}"),
                },
            ],
            stop_reason: Some(StopReason::ToolUse),
            model: Some("gpt-4o-mini".to_string()),
        };

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].id, "c1");
        assert_eq!(calls[0].tool_name, "slowTool");
        assert_eq!(calls[0].arguments, json!(null));
        assert_eq!(calls[1].id, "c2");
        assert_eq!(calls[1].arguments, json!("{\"n\": 1}"));
    }

    #[test]
    fn empty_response() {
        let response = LlmResponse {
            content: vec![],
            stop_reason: None,
            model: None,
        };
        assert_eq!(response.text_content(), "");
        assert!(!response.has_tool_calls());
    }

    #[test]
    fn finish_reason_mapping() {
        assert_eq!(StopReason::from_finish_reason("stop"), StopReason::EndTurn);
        assert_eq!(
            StopReason::from_finish_reason("tool_calls"),
            StopReason::ToolUse
        );
        assert_eq!(
            StopReason::from_finish_reason("length"),
            StopReason::MaxTokens
        );
        assert_eq!(
            StopReason::from_finish_reason("content_filter"),
            StopReason::Other("content_filter".to_string())
        );
    }

    #[test]
    fn content_block_serializes_with_type_tag() {
        let value = serde_json::to_value(ContentBlock::text("hi")).unwrap();
        assert_eq!(value, json!({"type": "text", "text": "hi"}));
    }
}
