//! Tool invocation use case.
//!
//! [`ToolInvoker::invoke`] turns one [`ToolCall`] into exactly one
//! [`ToolResult`]. It never fails: lookup, validation, timeout and handler
//! failures are all folded into an error-shaped result that the model gets
//! to see.
//!
//! ```text
//! lookup ──✗──▶ NOT_FOUND
//!   │
//! validate ─✗─▶ INVALID_ARGUMENT
//!   │
//! notify(started)
//!   │
//! spawn handler ── timeout ──▶ TIMEOUT (task detached)
//!   │          └── panic / Err ──▶ EXECUTION_FAILED
//!   ▼
//! notify(finished)
//! ```

use crate::config::ExecutionParams;
use crate::ports::status::{StatusEvent, StatusSink};
use relay_domain::{
    DefaultToolValidator, Tool, ToolCall, ToolError, ToolRegistry, ToolResult, ToolValidator,
};
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Runs tool calls against a registry.
///
/// Cheap to share: clone the `Arc` and invoke from as many tasks as needed.
pub struct ToolInvoker {
    registry: Arc<ToolRegistry>,
    validator: Box<dyn ToolValidator + Send + Sync>,
    status: Arc<dyn StatusSink>,
    default_timeout: Duration,
    tool_timeouts: HashMap<String, Duration>,
}

impl ToolInvoker {
    pub fn new(registry: Arc<ToolRegistry>, status: Arc<dyn StatusSink>) -> Self {
        let params = ExecutionParams::default();
        Self {
            registry,
            validator: Box::new(DefaultToolValidator),
            status,
            default_timeout: params.default_tool_timeout,
            tool_timeouts: params.tool_timeouts,
        }
    }

    /// Take timeout settings from execution parameters
    pub fn with_params(mut self, params: &ExecutionParams) -> Self {
        self.default_timeout = params.default_tool_timeout;
        self.tool_timeouts = params.tool_timeouts.clone();
        self
    }

    pub fn with_validator(mut self, validator: impl ToolValidator + Send + Sync + 'static) -> Self {
        self.validator = Box::new(validator);
        self
    }

    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Effective timeout: the tool's own, then the configured override, then the default.
    pub fn timeout_for(&self, tool: &dyn Tool) -> Duration {
        tool.timeout()
            .or_else(|| self.tool_timeouts.get(&tool.definition().name).copied())
            .unwrap_or(self.default_timeout)
    }

    /// Execute one tool call. Always returns a result correlated by call id.
    pub async fn invoke(&self, call: &ToolCall) -> ToolResult {
        let tool = match self.registry.lookup(&call.tool_name) {
            Ok(tool) => Arc::clone(tool),
            Err(_) => {
                warn!(call_id = %call.id, tool = %call.tool_name, "Unknown tool requested");
                return ToolResult::failure(
                    &call.id,
                    &call.tool_name,
                    ToolError::not_found(&call.tool_name),
                );
            }
        };
        let tool_name = tool.definition().name.clone();
        if tool_name != call.tool_name {
            debug!(alias = %call.tool_name, tool = %tool_name, "Resolved tool alias");
        }

        let args = match self.validator.validate(&call.arguments, tool.definition()) {
            Ok(args) => args,
            Err(e) => {
                warn!(call_id = %call.id, tool = %tool_name, error = %e, "Rejected tool arguments");
                return ToolResult::failure(
                    &call.id,
                    &tool_name,
                    ToolError::invalid_argument(e.to_string()),
                );
            }
        };

        let timeout = self.timeout_for(tool.as_ref());
        debug!(call_id = %call.id, tool = %tool_name, timeout_ms = timeout.as_millis() as u64, "Dispatching tool");
        self.status
            .notify(StatusEvent::started(&call.id, &tool_name, &args));

        let started = Instant::now();
        let handle = tokio::spawn(async move { tool.execute(args).await });

        // Dropping the JoinHandle on timeout detaches the task; its late
        // result goes nowhere.
        let outcome = tokio::time::timeout(timeout, handle).await;
        let duration_ms = started.elapsed().as_millis() as u64;

        let result = match outcome {
            Ok(Ok(Ok(payload))) => ToolResult::success(&call.id, &tool_name, payload),
            Ok(Ok(Err(e))) => {
                warn!(call_id = %call.id, tool = %tool_name, error = %e, "Tool handler failed");
                ToolResult::failure(
                    &call.id,
                    &tool_name,
                    ToolError::execution_failed(e.message()),
                )
            }
            Ok(Err(join_error)) => {
                let message = if join_error.is_panic() {
                    format!(
                        "Tool handler panicked: {}",
                        panic_message(join_error.into_panic())
                    )
                } else {
                    "Tool handler task was aborted".to_string()
                };
                warn!(call_id = %call.id, tool = %tool_name, "{}", message);
                ToolResult::failure(&call.id, &tool_name, ToolError::execution_failed(message))
            }
            Err(_) => {
                let after_ms = timeout.as_millis() as u64;
                warn!(call_id = %call.id, tool = %tool_name, after_ms, "Tool timed out");
                ToolResult::failure(&call.id, &tool_name, ToolError::timeout(&tool_name, after_ms))
            }
        }
        .with_duration(duration_ms);

        self.status.notify(StatusEvent::finished(&result));
        result
    }

    /// Result for a call that was never dispatched because the conversation
    /// was cancelled. Emits no status events.
    pub fn cancelled(call: &ToolCall) -> ToolResult {
        ToolResult::failure(&call.id, &call.tool_name, ToolError::cancelled(&call.tool_name))
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

impl std::fmt::Debug for ToolInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolInvoker")
            .field("registry", &self.registry)
            .field("default_timeout", &self.default_timeout)
            .field("tool_timeouts", &self.tool_timeouts)
            .finish()
    }
}
