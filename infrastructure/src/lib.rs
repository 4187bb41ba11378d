//! Infrastructure layer for tool-relay
//!
//! This crate contains adapters that implement the ports defined
//! in the application layer: the OpenAI-compatible model client, the
//! bounded status channel, JSON Schema conversion, the JSONL conversation
//! logger, built-in tools and configuration file loading.

pub mod config;
pub mod logging;
pub mod providers;
pub mod status;
pub mod tools;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileExecutionConfig, FileLoggingConfig,
    FileModelConfig,
};
pub use logging::JsonlConversationLogger;
pub use providers::{OpenAiCompatibleClient, OpenAiConfig, OpenAiError};
pub use status::{ChannelStatusSink, DEFAULT_STATUS_CAPACITY, status_channel};
pub use tools::{JsonSchemaToolConverter, builtin_registry, register_builtins};
