//! Tool capability abstraction
//!
//! A [`Tool`] is an explicit value bundling a [`ToolDefinition`] with the
//! handler that executes it. Tools are registered into a
//! [`ToolRegistry`](super::registry::ToolRegistry) by an explicit call; there
//! is no implicit global registration.
//!
//! ```
//! use relay_domain::tool::{FnTool, ToolDefinition, ToolParameter};
//! use serde_json::json;
//!
//! let tool = FnTool::new(
//!     ToolDefinition::new("lookup_balance", "Look up an account balance")
//!         .with_parameter(ToolParameter::required("account_id", "Account id")),
//!     |_args| async move { Ok(json!({ "balance": 42 })) },
//! );
//! # let _ = tool;
//! ```
//!
//! Handlers may run concurrently with each other and must not assume
//! exclusive access to anything shared with the orchestrator.

use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

use super::entities::ToolDefinition;
use super::traits::ToolArguments;

/// Failure reported by a tool handler.
///
/// The message is preserved verbatim in the resulting
/// `EXECUTION_FAILED` tool result.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for HandlerError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for HandlerError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<String> for HandlerError {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

impl From<&str> for HandlerError {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

/// A callable tool: metadata plus handler.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Declared metadata (name, description, parameters)
    fn definition(&self) -> &ToolDefinition;

    /// Per-tool timeout override. `None` uses the configured default.
    fn timeout(&self) -> Option<Duration> {
        None
    }

    /// Execute with arguments already validated against [`definition`](Self::definition)
    async fn execute(&self, args: ToolArguments) -> Result<serde_json::Value, HandlerError>;
}

/// Closure-backed [`Tool`]
pub struct FnTool<F> {
    definition: ToolDefinition,
    timeout: Option<Duration>,
    handler: F,
}

impl<F, Fut> FnTool<F>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, HandlerError>> + Send,
{
    pub fn new(definition: ToolDefinition, handler: F) -> Self {
        Self {
            definition,
            timeout: None,
            handler,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

#[async_trait]
impl<F, Fut> Tool for FnTool<F>
where
    F: Fn(ToolArguments) -> Fut + Send + Sync,
    Fut: Future<Output = Result<serde_json::Value, HandlerError>> + Send,
{
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    async fn execute(&self, args: ToolArguments) -> Result<serde_json::Value, HandlerError> {
        (self.handler)(args).await
    }
}

impl<F> std::fmt::Debug for FnTool<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FnTool")
            .field("name", &self.definition.name)
            .field("timeout", &self.timeout)
            .finish()
    }
}
