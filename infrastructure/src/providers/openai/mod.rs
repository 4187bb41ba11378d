//! OpenAI-compatible chat-completions provider
//!
//! Works against any backend exposing `/chat/completions` with function
//! tools (OpenAI, Azure-style gateways, Ollama, vLLM, LM Studio).

mod client;
mod types;

pub use client::{OpenAiCompatibleClient, OpenAiConfig};
pub use types::OpenAiError;
