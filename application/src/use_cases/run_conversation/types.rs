//! Type definitions for the RunConversation use case.

use crate::ports::model_client::GatewayError;
use relay_domain::PhaseError;
use serde::Serialize;
use thiserror::Error;

/// Input for a single conversation
#[derive(Debug, Clone)]
pub struct RunConversationInput {
    pub system_prompt: String,
    pub user_message: String,
}

impl RunConversationInput {
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            system_prompt: system_prompt.into(),
            user_message: user_message.into(),
        }
    }
}

/// Why a conversation stopped without error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopCause {
    /// The model answered without requesting tools
    Answered,
    /// The model still requested tools when `max_rounds` was reached
    RoundLimit,
}

/// Result of a finished conversation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConversationOutcome {
    /// Final answer text. On a round limit, the latest non-empty assistant text.
    pub answer: String,
    /// Model rounds used
    pub rounds: u32,
    pub stop: StopCause,
}

/// Errors that end a conversation
#[derive(Error, Debug)]
pub enum RunConversationError {
    #[error("Model unavailable after {attempts} attempt(s): {last_error}")]
    ModelUnavailable {
        attempts: u32,
        last_error: GatewayError,
    },

    #[error("Conversation cancelled")]
    Cancelled,

    #[error("Invalid conversation state: {0}")]
    InvalidState(#[from] PhaseError),
}

impl RunConversationError {
    /// Check if this error represents a cancellation
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RunConversationError::Cancelled)
    }
}
