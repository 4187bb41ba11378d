//! Port for structured conversation logging.
//!
//! [`ConversationLogger`] records what happened in a conversation (model
//! responses, tool results, the final answer) as machine-readable records.
//! It complements `tracing`, which carries human-readable diagnostics.

use crate::use_cases::run_conversation::StopCause;
use relay_domain::{StopReason, ToolCall, ToolResult};
use serde::Serialize;

/// One step of a conversation, in the order the orchestrator reaches it.
///
/// Serializes with a `type` tag, e.g. `{"type":"tool_result","round":1,...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConversationEvent {
    Started {
        model: String,
        tools: usize,
        max_rounds: u32,
    },
    ModelResponse {
        round: u32,
        text: String,
        tool_calls: Vec<ToolCall>,
        stop_reason: Option<StopReason>,
    },
    ToolResult {
        round: u32,
        result: ToolResult,
    },
    FinalAnswer {
        rounds: u32,
        stop: StopCause,
        answer: String,
    },
    Cancelled {
        round: u32,
    },
}

impl ConversationEvent {
    /// Tag written as the record's `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Started { .. } => "started",
            Self::ModelResponse { .. } => "model_response",
            Self::ToolResult { .. } => "tool_result",
            Self::FinalAnswer { .. } => "final_answer",
            Self::Cancelled { .. } => "cancelled",
        }
    }
}

/// Port for logging conversation events.
///
/// `log` is synchronous and infallible; a failing sink must swallow its own
/// errors so the conversation is never disrupted by logging.
pub trait ConversationLogger: Send + Sync {
    fn log(&self, event: ConversationEvent);
}

/// No-op implementation for tests and when logging is disabled.
pub struct NoConversationLogger;

impl ConversationLogger for NoConversationLogger {
    fn log(&self, _event: ConversationEvent) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_serializes_with_type_tag() {
        let event = ConversationEvent::FinalAnswer {
            rounds: 2,
            stop: StopCause::RoundLimit,
            answer: "partial".to_string(),
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({ "type": "final_answer", "rounds": 2, "stop": "round_limit", "answer": "partial" })
        );
        assert_eq!(event.kind(), "final_answer");
    }

    #[test]
    fn test_tool_result_event_nests_result() {
        let event = ConversationEvent::ToolResult {
            round: 1,
            result: ToolResult::success("c1", "lookup_balance", json!({ "balance": 42 })),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "tool_result");
        assert_eq!(value["round"], 1);
        assert_eq!(value["result"]["call_id"], "c1");
        assert_eq!(event.kind(), "tool_result");
    }
}
