//! Application layer for tool-relay
//!
//! This crate contains use cases, port definitions, and application configuration.
//! It depends only on the domain layer.

pub mod config;
pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use config::{ExecutionParams, RetryPolicy};
pub use ports::{
    conversation_logger::{ConversationEvent, ConversationLogger, NoConversationLogger},
    model_client::{GatewayError, ModelClient, ModelRequest},
    status::{NoStatus, StatusEvent, StatusSink},
    tool_schema::ToolSchemaPort,
};
pub use use_cases::invoke_tool::ToolInvoker;
pub use use_cases::run_conversation::{
    ConversationOrchestrator, ConversationOutcome, RunConversationError, RunConversationInput,
    StopCause,
};
