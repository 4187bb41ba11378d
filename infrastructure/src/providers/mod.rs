//! Model client adapters

pub mod openai;

pub use openai::{OpenAiCompatibleClient, OpenAiConfig, OpenAiError};
