//! Conversation state machine.
//!
//! ```text
//! Idle ──▶ AwaitingModel ──┬──▶ Done
//!               ▲          └──▶ HasToolCalls ──▶ ExecutingTools ──┐
//!               └─────────────────────────────────────────────────┘
//! ```
//!
//! `ExecutingTools → Done` is also legal: it ends a conversation that hit
//! its round limit or was cancelled between rounds. `Done` is terminal.

use crate::session::entities::Message;
use crate::session::transcript::{Transcript, TranscriptError};
use crate::tool::value_objects::ToolResult;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Phase of a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversationPhase {
    /// Transcript seeded, no model call yet
    Idle,
    /// Waiting for the model backend
    AwaitingModel,
    /// The latest assistant message requested tools
    HasToolCalls,
    /// Tool calls of the current round are running
    ExecutingTools,
    Done,
}

impl ConversationPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversationPhase::Idle => "idle",
            ConversationPhase::AwaitingModel => "awaiting_model",
            ConversationPhase::HasToolCalls => "has_tool_calls",
            ConversationPhase::ExecutingTools => "executing_tools",
            ConversationPhase::Done => "done",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ConversationPhase::Done)
    }

    /// Whether `self → next` is a legal transition
    pub fn can_advance_to(&self, next: ConversationPhase) -> bool {
        use ConversationPhase::*;
        matches!(
            (self, next),
            (Idle, AwaitingModel)
                | (AwaitingModel, Done)
                | (AwaitingModel, HasToolCalls)
                | (HasToolCalls, ExecutingTools)
                | (ExecutingTools, AwaitingModel)
                | (ExecutingTools, Done)
        )
    }
}

impl std::fmt::Display for ConversationPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Rejected phase transitions and transcript writes
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PhaseError {
    #[error("Illegal phase transition: {from} -> {to}")]
    IllegalTransition {
        from: ConversationPhase,
        to: ConversationPhase,
    },

    #[error("Conversation is already done")]
    AlreadyDone,

    #[error("Cannot record {what} while {phase}")]
    WrongPhase {
        what: &'static str,
        phase: ConversationPhase,
    },

    #[error(transparent)]
    Transcript(#[from] TranscriptError),
}

/// State of one conversation.
///
/// Owned by a single orchestrator; every mutation goes through a method
/// that checks the current phase.
#[derive(Debug, Clone, Serialize)]
pub struct ConversationState {
    transcript: Transcript,
    round: u32,
    phase: ConversationPhase,
    cancelled: bool,
}

impl ConversationState {
    /// New conversation seeded with a system prompt and the user's message
    pub fn new(system_prompt: impl Into<String>, user_message: impl Into<String>) -> Self {
        Self {
            transcript: Transcript::seeded(system_prompt, user_message),
            round: 0,
            phase: ConversationPhase::Idle,
            cancelled: false,
        }
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Number of model rounds started so far.
    ///
    /// A round counts from the moment the state enters `AwaitingModel`, so a
    /// round whose model call never succeeded is included. After such a
    /// failure the phase stays `AwaitingModel` and no message is recorded.
    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn phase(&self) -> ConversationPhase {
        self.phase
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_done(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Move to `next`. Entering `AwaitingModel` starts a new round.
    pub fn advance(&mut self, next: ConversationPhase) -> Result<(), PhaseError> {
        if self.phase.is_terminal() {
            return Err(PhaseError::AlreadyDone);
        }
        if !self.phase.can_advance_to(next) {
            return Err(PhaseError::IllegalTransition {
                from: self.phase,
                to: next,
            });
        }
        if next == ConversationPhase::AwaitingModel {
            self.round += 1;
        }
        self.phase = next;
        Ok(())
    }

    /// Append the assistant message of the current round.
    ///
    /// Only legal while awaiting the model, i.e. after a successful
    /// response and before the phase moves on.
    pub fn record_assistant(&mut self, message: Message) -> Result<(), PhaseError> {
        if self.phase != ConversationPhase::AwaitingModel {
            return Err(PhaseError::WrongPhase {
                what: "assistant message",
                phase: self.phase,
            });
        }
        self.transcript.push(message)?;
        Ok(())
    }

    /// Append the results of the current round, in call order.
    pub fn record_tool_results(&mut self, results: &[ToolResult]) -> Result<(), PhaseError> {
        if self.phase != ConversationPhase::ExecutingTools {
            return Err(PhaseError::WrongPhase {
                what: "tool results",
                phase: self.phase,
            });
        }
        self.transcript.append_tool_results(results)?;
        Ok(())
    }

    /// Raise the cancellation flag. The phase is left to the orchestrator.
    pub fn mark_cancelled(&mut self) {
        self.cancelled = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::entities::ToolCall;
    use serde_json::json;
    use ConversationPhase::*;

    #[test]
    fn test_new_state_is_idle_and_seeded() {
        let state = ConversationState::new("system", "hello");
        assert_eq!(state.phase(), Idle);
        assert_eq!(state.round(), 0);
        assert_eq!(state.transcript().len(), 2);
        assert!(!state.is_cancelled());
    }

    #[test]
    fn test_full_round_trip_through_phases() {
        let mut state = ConversationState::new("s", "u");
        state.advance(AwaitingModel).unwrap();
        assert_eq!(state.round(), 1);

        state
            .record_assistant(Message::assistant_with_tool_calls(
                "",
                vec![ToolCall::new("c1", "lookup_balance")],
            ))
            .unwrap();
        state.advance(HasToolCalls).unwrap();
        state.advance(ExecutingTools).unwrap();
        state
            .record_tool_results(&[ToolResult::success("c1", "lookup_balance", json!(42))])
            .unwrap();
        state.advance(AwaitingModel).unwrap();
        assert_eq!(state.round(), 2);

        state.record_assistant(Message::assistant("done")).unwrap();
        state.advance(Done).unwrap();
        assert!(state.is_done());
        assert_eq!(state.round(), 2);
        assert_eq!(state.transcript().len(), 5);
    }

    #[test]
    fn test_illegal_transitions_rejected() {
        let mut state = ConversationState::new("s", "u");
        assert_eq!(
            state.advance(ExecutingTools),
            Err(PhaseError::IllegalTransition {
                from: Idle,
                to: ExecutingTools
            })
        );
        assert_eq!(state.round(), 0);

        state.advance(AwaitingModel).unwrap();
        assert!(state.advance(AwaitingModel).is_err());
        assert_eq!(state.round(), 1);
    }

    #[test]
    fn test_done_is_terminal() {
        let mut state = ConversationState::new("s", "u");
        state.advance(AwaitingModel).unwrap();
        state.advance(Done).unwrap();
        assert_eq!(state.advance(AwaitingModel), Err(PhaseError::AlreadyDone));
    }

    #[test]
    fn test_writes_checked_against_phase() {
        let mut state = ConversationState::new("s", "u");
        assert!(matches!(
            state.record_assistant(Message::assistant("early")),
            Err(PhaseError::WrongPhase { phase: Idle, .. })
        ));
        assert!(matches!(
            state.record_tool_results(&[]),
            Err(PhaseError::WrongPhase { .. })
        ));
        assert_eq!(state.transcript().len(), 2);
    }

    #[test]
    fn test_transcript_errors_surface() {
        let mut state = ConversationState::new("s", "u");
        state.advance(AwaitingModel).unwrap();
        state
            .record_assistant(Message::assistant_with_tool_calls(
                "",
                vec![ToolCall::new("c1", "a"), ToolCall::new("c2", "b")],
            ))
            .unwrap();
        state.advance(HasToolCalls).unwrap();
        state.advance(ExecutingTools).unwrap();

        let err = state
            .record_tool_results(&[ToolResult::success("c2", "b", json!(null))])
            .unwrap_err();
        assert!(matches!(
            err,
            PhaseError::Transcript(TranscriptError::OutOfOrder { .. })
        ));
    }

    #[test]
    fn test_transition_table() {
        assert!(Idle.can_advance_to(AwaitingModel));
        assert!(AwaitingModel.can_advance_to(Done));
        assert!(AwaitingModel.can_advance_to(HasToolCalls));
        assert!(ExecutingTools.can_advance_to(Done));
        assert!(!HasToolCalls.can_advance_to(Done));
        assert!(!Done.can_advance_to(AwaitingModel));
        assert!(!Idle.can_advance_to(Done));
    }

    #[test]
    fn test_round_counts_before_model_responds() {
        let mut state = ConversationState::new("sys", "hi");
        state.advance(ConversationPhase::AwaitingModel).unwrap();

        // No response recorded yet, the round is already counted
        assert_eq!(state.round(), 1);
        assert_eq!(state.phase(), ConversationPhase::AwaitingModel);
        assert_eq!(state.transcript().len(), 2);
    }
}
