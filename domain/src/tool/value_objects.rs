//! Tool domain value objects: immutable result and error types
//!
//! These types form the **output side** of a tool call. Every
//! [`ToolCall`](super::entities::ToolCall) produces exactly one [`ToolResult`],
//! carrying either a success payload or a structured [`ToolError`], never both.
//!
//! Per-tool failures never escape the invoker: they are folded into the
//! transcript as a normal tool-result message so the model can adapt.

use serde::{Deserialize, Serialize};

/// Failure class of a tool call.
///
/// | Kind | Code | Raised when |
/// |------|------|-------------|
/// | `NotFound` | `NOT_FOUND` | Tool name is not registered |
/// | `InvalidArgument` | `INVALID_ARGUMENT` | Arguments do not match the schema |
/// | `Timeout` | `TIMEOUT` | Handler exceeded its timeout |
/// | `ExecutionFailed` | `EXECUTION_FAILED` | Handler returned an error or panicked |
/// | `Cancelled` | `CANCELLED` | Conversation cancelled before dispatch |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolErrorKind {
    NotFound,
    InvalidArgument,
    Timeout,
    ExecutionFailed,
    Cancelled,
}

impl ToolErrorKind {
    pub fn code(&self) -> &'static str {
        match self {
            ToolErrorKind::NotFound => "NOT_FOUND",
            ToolErrorKind::InvalidArgument => "INVALID_ARGUMENT",
            ToolErrorKind::Timeout => "TIMEOUT",
            ToolErrorKind::ExecutionFailed => "EXECUTION_FAILED",
            ToolErrorKind::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for ToolErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Structured description of a failed tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolError {
    /// Failure class
    #[serde(rename = "code")]
    pub kind: ToolErrorKind,
    /// Human-readable error message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ToolError {
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn not_found(tool_name: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::NotFound,
            format!("Tool not found: {}", tool_name.into()),
        )
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::InvalidArgument, message)
    }

    pub fn execution_failed(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ExecutionFailed, message)
    }

    pub fn timeout(tool_name: impl Into<String>, after_ms: u64) -> Self {
        Self::new(
            ToolErrorKind::Timeout,
            format!(
                "Tool '{}' did not finish within {} ms",
                tool_name.into(),
                after_ms
            ),
        )
    }

    pub fn cancelled(tool_name: impl Into<String>) -> Self {
        Self::new(
            ToolErrorKind::Cancelled,
            format!(
                "Tool '{}' was not run: conversation cancelled",
                tool_name.into()
            ),
        )
    }
}

impl std::fmt::Display for ToolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)?;
        if let Some(details) = &self.details {
            write!(f, " ({})", details)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolError {}

/// Either a success payload or an error; mutually exclusive.
///
/// Serializes as `{"payload": ...}` or `{"error": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolOutcome {
    Payload(serde_json::Value),
    Error(ToolError),
}

/// Outcome of executing one tool call, correlated by call id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Id of the originating tool call
    pub call_id: String,
    /// Name of the tool as requested by the model
    pub tool_name: String,
    #[serde(flatten)]
    pub outcome: ToolOutcome,
    #[serde(default)]
    pub metadata: ToolResultMetadata,
}

/// Structured metadata about tool execution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResultMetadata {
    /// Wall-clock duration of the handler in milliseconds (absent when the
    /// call was rejected before the handler ran)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Payload(payload),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Create a failed result
    pub fn failure(
        call_id: impl Into<String>,
        tool_name: impl Into<String>,
        error: ToolError,
    ) -> Self {
        Self {
            call_id: call_id.into(),
            tool_name: tool_name.into(),
            outcome: ToolOutcome::Error(error),
            metadata: ToolResultMetadata::default(),
        }
    }

    /// Add duration metadata
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.metadata.duration_ms = Some(duration_ms);
        self
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ToolOutcome::Payload(_))
    }

    pub fn payload(&self) -> Option<&serde_json::Value> {
        match &self.outcome {
            ToolOutcome::Payload(value) => Some(value),
            ToolOutcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ToolError> {
        match &self.outcome {
            ToolOutcome::Payload(_) => None,
            ToolOutcome::Error(error) => Some(error),
        }
    }

    /// Error kind, if this result is a failure
    pub fn error_kind(&self) -> Option<ToolErrorKind> {
        self.error().map(|e| e.kind)
    }
}
