//! Conversation session domain.
//!
//! - [`entities::Message`]: a single message (system, user, assistant, tool result)
//! - [`transcript::Transcript`]: append-only history with call-id correlation
//! - [`response::LlmResponse`]: a model turn: text and/or tool use blocks

pub mod entities;
pub mod response;
pub mod transcript;
