//! Tool domain module
//!
//! This module defines the core abstractions of the **Tool System**, the
//! named, schema-described capabilities a model may ask to invoke in the
//! middle of a conversation.
//!
//! # Overview
//!
//! ```text
//! ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//! │ ToolRegistry │───▶│ ToolCall     │───▶│ ToolResult   │
//! │ (Tool values)│    │ (from model) │    │ payload|error│
//! └──────┬───────┘    └──────────────┘    └──────────────┘
//!        │
//!        ├─ aliases: "bash" → "run_command"
//!        └─ tools:   "run_command" → Arc<dyn Tool>
//! ```
//!
//! # Key Types
//!
//! - [`ToolDefinition`] / [`ToolParameter`]: declared metadata, the single
//!   source for both the advertised schema and argument validation
//! - [`Tool`]: metadata plus handler; [`FnTool`] wraps an async closure
//! - [`ToolRegistry`]: registration-ordered lookup with alias support
//! - [`ToolValidator`]: pure, data-driven argument validation
//! - [`ToolCall`] → [`ToolResult`]: one request, exactly one outcome
//!
//! # Architecture
//!
//! - **Domain** (this module): pure definitions, no I/O
//! - **Application**: `ToolInvoker` runs handlers with timeouts and
//!   status notifications
//! - **Infrastructure**: JSON Schema conversion and builtin tools

pub mod entities;
pub mod error;
pub mod handler;
pub mod registry;
pub mod traits;
pub mod value_objects;

pub use entities::{ParamType, ToolCall, ToolDefinition, ToolParameter};
pub use error::{SchemaBuildError, ValidationError};
pub use handler::{FnTool, HandlerError, Tool};
pub use registry::{RegistryError, ToolRegistry};
pub use traits::{DefaultToolValidator, ToolArguments, ToolValidator};
pub use value_objects::{ToolError, ToolErrorKind, ToolOutcome, ToolResult, ToolResultMetadata};
