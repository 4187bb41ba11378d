//! Domain layer for tool-relay
//!
//! This crate contains the core entities and rules of the tool-augmented
//! conversation loop. It has no dependencies on infrastructure or
//! presentation concerns.
//!
//! # Core Concepts
//!
//! - **Tool**: a named, schema-described capability ([`Tool`], [`ToolDefinition`])
//! - **ToolCall / ToolResult**: one request from the model and its single outcome
//! - **Transcript**: the append-only message history, with call-id correlation
//! - **ConversationState**: transcript + round counter + phase + cancellation flag

pub mod config;
pub mod conversation;
pub mod session;
pub mod tool;

// Re-export commonly used types
pub use config::{ConfigIssue, ConfigIssueCode, OutputFormat, Severity};
pub use conversation::{ConversationPhase, ConversationState, PhaseError};
pub use session::{
    entities::{Message, MessageContent, Role},
    response::{ContentBlock, LlmResponse, StopReason},
    transcript::{Transcript, TranscriptError},
};
pub use tool::{
    entities::{ParamType, ToolCall, ToolDefinition, ToolParameter},
    error::{SchemaBuildError, ValidationError},
    handler::{FnTool, HandlerError, Tool},
    registry::{RegistryError, ToolRegistry},
    traits::{DefaultToolValidator, ToolArguments, ToolValidator},
    value_objects::{ToolError, ToolErrorKind, ToolOutcome, ToolResult, ToolResultMetadata},
};
