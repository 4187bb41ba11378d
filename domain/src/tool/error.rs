//! Tool declaration and argument errors

use super::entities::ParamType;
use thiserror::Error;

/// Malformed tool metadata, detected when a tool is registered or its
/// schema is built. Never raised while a conversation is running.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SchemaBuildError {
    #[error("Tool name must not be empty")]
    EmptyToolName,

    #[error("Tool '{tool}': parameter '{parameter}' has unsupported type '{type_tag}'")]
    UnsupportedType {
        tool: String,
        parameter: String,
        type_tag: String,
    },

    #[error("Tool '{tool}': parameter '{parameter}' is declared more than once")]
    DuplicateParameter { tool: String, parameter: String },

    #[error("Tool '{tool}': parameter '{parameter}' is required but declares a default")]
    RequiredWithDefault { tool: String, parameter: String },

    #[error("Tool '{tool}': default for parameter '{parameter}' is not of type {expected}")]
    DefaultTypeMismatch {
        tool: String,
        parameter: String,
        expected: ParamType,
    },
}

/// Argument/schema mismatch for a single tool call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Arguments for tool '{tool}' are not valid JSON: {reason}")]
    MalformedArguments { tool: String, reason: String },

    #[error("Arguments for tool '{tool}' must be an object, got {found}")]
    NotAnObject { tool: String, found: &'static str },

    #[error("Missing required parameter '{parameter}' for tool '{tool}'")]
    MissingParameter { tool: String, parameter: String },

    #[error("Unknown parameter '{parameter}' for tool '{tool}'")]
    UnknownParameter { tool: String, parameter: String },

    #[error("Parameter '{parameter}' for tool '{tool}' must be of type {expected}, got {found}")]
    WrongType {
        tool: String,
        parameter: String,
        expected: ParamType,
        found: &'static str,
    },
}

/// JSON type name of a value, for error messages
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(n) if n.is_f64() => "number",
        serde_json::Value::Number(_) => "integer",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}
