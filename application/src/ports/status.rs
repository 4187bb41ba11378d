//! Status notification port.
//!
//! [`StatusSink`] pushes "tool started" / "tool finished" events to an
//! observer such as a UI. Notifications are best effort: `notify` never
//! blocks the conversation loop and never fails. A sink that cannot
//! deliver an event drops it.

use relay_domain::{ToolArguments, ToolOutcome, ToolResult};
use serde::Serialize;

/// Event pushed to an external observer.
///
/// Wire shape:
///
/// ```json
/// {"type": "tool_call_started", "call_id": "c1", "tool_name": "lookup_balance", "arguments": {...}}
/// {"type": "tool_call_finished", "call_id": "c1", "tool_name": "lookup_balance", "duration_ms": 12, "payload": {...}}
/// {"type": "tool_call_finished", "call_id": "c1", "tool_name": "lookup_balance", "duration_ms": 30000, "error": {...}}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StatusEvent {
    ToolCallStarted {
        call_id: String,
        tool_name: String,
        arguments: serde_json::Value,
    },
    ToolCallFinished {
        call_id: String,
        tool_name: String,
        duration_ms: u64,
        #[serde(flatten)]
        outcome: ToolOutcome,
    },
}

impl StatusEvent {
    pub fn started(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        arguments: &ToolArguments,
    ) -> Self {
        StatusEvent::ToolCallStarted {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            arguments: serde_json::Value::Object(arguments.clone()),
        }
    }

    pub fn finished(result: &ToolResult) -> Self {
        StatusEvent::ToolCallFinished {
            call_id: result.call_id.clone(),
            tool_name: result.tool_name.clone(),
            duration_ms: result.metadata.duration_ms.unwrap_or(0),
            outcome: result.outcome.clone(),
        }
    }

    pub fn call_id(&self) -> &str {
        match self {
            StatusEvent::ToolCallStarted { call_id, .. }
            | StatusEvent::ToolCallFinished { call_id, .. } => call_id,
        }
    }

    pub fn tool_name(&self) -> &str {
        match self {
            StatusEvent::ToolCallStarted { tool_name, .. }
            | StatusEvent::ToolCallFinished { tool_name, .. } => tool_name,
        }
    }

    pub fn is_started(&self) -> bool {
        matches!(self, StatusEvent::ToolCallStarted { .. })
    }
}

/// Sink for status events.
///
/// Called concurrently from every running tool invocation; implementations
/// must be safe for concurrent use and must return immediately.
pub trait StatusSink: Send + Sync {
    fn notify(&self, event: StatusEvent);
}

/// No-op sink for tests and headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct NoStatus;

impl StatusSink for NoStatus {
    fn notify(&self, _event: StatusEvent) {}
}
