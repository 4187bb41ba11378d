//! Conversation state: transcript, round counter, phase and cancellation flag.

pub mod state;

pub use state::{ConversationPhase, ConversationState, PhaseError};
