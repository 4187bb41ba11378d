//! Append-only conversation transcript.
//!
//! The transcript enforces call-id correlation: a tool-result message may
//! only be appended for a call requested by the immediately preceding
//! assistant message, and a round's results must be complete before any
//! other message follows.

use super::entities::{Message, Role};
use crate::tool::entities::ToolCall;
use crate::tool::value_objects::ToolResult;
use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

/// Violations of transcript ordering rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TranscriptError {
    #[error("Tool result '{0}' has no matching outstanding tool call")]
    UnmatchedToolResult(String),

    #[error("Tool result out of order: expected '{expected}', got '{found}'")]
    OutOfOrder { expected: String, found: String },

    #[error("Round is missing results for calls: {}", .0.join(", "))]
    IncompleteRound(Vec<String>),

    #[error("{0} tool call(s) are still awaiting results")]
    PendingToolCalls(usize),

    #[error("Call id '{0}' appears more than once in the same round")]
    DuplicateCallId(String),
}

/// Ordered, append-only message history
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transcript seeded with a system prompt and the user's message
    pub fn seeded(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system), Message::user(user)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Calls of the latest assistant message that have no result yet, in
    /// request order.
    pub fn outstanding_calls(&self) -> Vec<&ToolCall> {
        let mut answered = HashSet::new();
        for message in self.messages.iter().rev() {
            match message.role {
                Role::Tool => {
                    if let Some(id) = &message.call_id {
                        answered.insert(id.as_str());
                    }
                }
                Role::Assistant => {
                    return message
                        .tool_calls
                        .iter()
                        .filter(|c| !answered.contains(c.id.as_str()))
                        .collect();
                }
                _ => return Vec::new(),
            }
        }
        Vec::new()
    }

    /// Append a non-tool message.
    ///
    /// Rejected while tool calls of the previous assistant message are
    /// still unanswered. Tool-result messages go through
    /// [`append_tool_results`](Self::append_tool_results).
    pub fn push(&mut self, message: Message) -> Result<(), TranscriptError> {
        if message.role == Role::Tool {
            let id = message.call_id.clone().unwrap_or_default();
            return Err(TranscriptError::UnmatchedToolResult(id));
        }

        let pending = self.outstanding_calls().len();
        if pending > 0 {
            return Err(TranscriptError::PendingToolCalls(pending));
        }

        let mut seen = HashSet::new();
        for call in &message.tool_calls {
            if !seen.insert(call.id.as_str()) {
                return Err(TranscriptError::DuplicateCallId(call.id.clone()));
            }
        }

        self.messages.push(message);
        Ok(())
    }

    /// Append one tool-result message per result.
    ///
    /// The results must answer every outstanding call exactly once, in the
    /// order the calls were requested. Nothing is appended on error.
    pub fn append_tool_results(&mut self, results: &[ToolResult]) -> Result<(), TranscriptError> {
        let outstanding: Vec<String> = self
            .outstanding_calls()
            .into_iter()
            .map(|c| c.id.clone())
            .collect();

        for (i, result) in results.iter().enumerate() {
            match outstanding.get(i) {
                Some(expected) if *expected == result.call_id => {}
                Some(expected) => {
                    if outstanding.contains(&result.call_id) {
                        return Err(TranscriptError::OutOfOrder {
                            expected: expected.clone(),
                            found: result.call_id.clone(),
                        });
                    }
                    return Err(TranscriptError::UnmatchedToolResult(result.call_id.clone()));
                }
                None => {
                    return Err(TranscriptError::UnmatchedToolResult(result.call_id.clone()));
                }
            }
        }

        if results.len() < outstanding.len() {
            return Err(TranscriptError::IncompleteRound(
                outstanding[results.len()..].to_vec(),
            ));
        }

        self.messages
            .extend(results.iter().map(Message::tool_result));
        Ok(())
    }
}
