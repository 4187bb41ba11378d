//! Tool domain entities

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::error::SchemaBuildError;

/// Type tag of a declared tool parameter.
///
/// Parsed from the `param_type` string of a [`ToolParameter`]. The tag
/// `"path"` is accepted as an alias of `"string"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
}

impl ParamType {
    /// JSON Schema type name for this parameter type
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamType::String => "string",
            ParamType::Number => "number",
            ParamType::Integer => "integer",
            ParamType::Boolean => "boolean",
            ParamType::Object => "object",
            ParamType::Array => "array",
        }
    }

    /// Check whether a JSON value conforms to this type.
    ///
    /// `Integer` only accepts integral numbers; `Number` accepts any number.
    pub fn matches(&self, value: &serde_json::Value) -> bool {
        match self {
            ParamType::String => value.is_string(),
            ParamType::Number => value.is_number(),
            ParamType::Integer => value.is_i64() || value.is_u64(),
            ParamType::Boolean => value.is_boolean(),
            ParamType::Object => value.is_object(),
            ParamType::Array => value.is_array(),
        }
    }
}

impl FromStr for ParamType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "string" | "path" => Ok(ParamType::String),
            "number" => Ok(ParamType::Number),
            "integer" => Ok(ParamType::Integer),
            "boolean" => Ok(ParamType::Boolean),
            "object" => Ok(ParamType::Object),
            "array" => Ok(ParamType::Array),
            other => Err(other.to_string()),
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Definition of a tool that can be requested by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// Unique name of the tool (e.g., "lookup_balance")
    pub name: String,
    /// Description shown to the model
    pub description: String,
    /// Parameter specifications, in declaration order
    pub parameters: Vec<ToolParameter>,
}

/// Parameter specification for a tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolParameter {
    /// Parameter name
    pub name: String,
    /// Parameter description
    pub description: String,
    /// Whether this parameter is required
    pub required: bool,
    /// Parameter type tag (e.g., "string", "path", "integer")
    pub param_type: String,
    /// Value used when an optional parameter is omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: Vec::new(),
        }
    }

    pub fn with_parameter(mut self, param: ToolParameter) -> Self {
        self.parameters.push(param);
        self
    }

    /// Look up a declared parameter by name
    pub fn parameter(&self, name: &str) -> Option<&ToolParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }

    /// Check the declared metadata for mistakes that would make the tool
    /// impossible to advertise or validate against.
    pub fn validate(&self) -> Result<(), SchemaBuildError> {
        if self.name.trim().is_empty() {
            return Err(SchemaBuildError::EmptyToolName);
        }

        let mut seen = std::collections::HashSet::new();
        for param in &self.parameters {
            if !seen.insert(param.name.as_str()) {
                return Err(SchemaBuildError::DuplicateParameter {
                    tool: self.name.clone(),
                    parameter: param.name.clone(),
                });
            }

            let param_type = param.parsed_type().map_err(|tag| {
                SchemaBuildError::UnsupportedType {
                    tool: self.name.clone(),
                    parameter: param.name.clone(),
                    type_tag: tag,
                }
            })?;

            if let Some(default) = &param.default {
                if param.required {
                    return Err(SchemaBuildError::RequiredWithDefault {
                        tool: self.name.clone(),
                        parameter: param.name.clone(),
                    });
                }
                if !param_type.matches(default) {
                    return Err(SchemaBuildError::DefaultTypeMismatch {
                        tool: self.name.clone(),
                        parameter: param.name.clone(),
                        expected: param_type,
                    });
                }
            }
        }

        Ok(())
    }
}

impl ToolParameter {
    pub fn new(name: impl Into<String>, description: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            required,
            param_type: "string".to_string(),
            default: None,
        }
    }

    /// A parameter the model must always supply
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, true)
    }

    /// A parameter the model may omit
    pub fn optional(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(name, description, false)
    }

    pub fn with_type(mut self, param_type: impl Into<String>) -> Self {
        self.param_type = param_type.into();
        self
    }

    /// Set the default value. A defaulted parameter is never required.
    pub fn with_default(mut self, value: impl Into<serde_json::Value>) -> Self {
        self.default = Some(value.into());
        self.required = false;
        self
    }

    /// Parse the type tag; returns the offending tag on failure
    pub fn parsed_type(&self) -> Result<ParamType, String> {
        self.param_type.parse()
    }
}

/// A request, emitted by the model, to invoke one tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Model-supplied identifier, unique within a round
    pub id: String,
    /// Name of the tool to call
    pub tool_name: String,
    /// Unparsed arguments as received from the model
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, tool_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_name: tool_name.into(),
            arguments: serde_json::Value::Null,
        }
    }

    pub fn with_arguments(mut self, arguments: serde_json::Value) -> Self {
        self.arguments = arguments;
        self
    }

    /// Add a single argument, turning the payload into an object if needed
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        if !self.arguments.is_object() {
            self.arguments = serde_json::Value::Object(serde_json::Map::new());
        }
        if let serde_json::Value::Object(map) = &mut self.arguments {
            map.insert(key.into(), value.into());
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_param_type_parsing() {
        assert_eq!("path".parse::<ParamType>(), Ok(ParamType::String));
        assert_eq!("integer".parse::<ParamType>(), Ok(ParamType::Integer));
        assert_eq!("uuid".parse::<ParamType>(), Err("uuid".to_string()));
    }

    #[test]
    fn test_param_type_matches() {
        assert!(ParamType::Integer.matches(&json!(3)));
        assert!(!ParamType::Integer.matches(&json!(3.5)));
        assert!(ParamType::Number.matches(&json!(3.5)));
        assert!(ParamType::Number.matches(&json!(3)));
        assert!(!ParamType::String.matches(&json!(3)));
        assert!(ParamType::Array.matches(&json!([1, 2])));
    }

    #[test]
    fn test_tool_definition() {
        let tool = ToolDefinition::new("lookup_balance", "Look up an account balance")
            .with_parameter(ToolParameter::required("account_id", "Account identifier"))
            .with_parameter(
                ToolParameter::optional("currency", "ISO currency code").with_default("EUR"),
            );

        assert_eq!(tool.name, "lookup_balance");
        assert_eq!(tool.parameters.len(), 2);
        assert!(tool.parameter("account_id").unwrap().required);
        assert!(!tool.parameter("currency").unwrap().required);
        assert!(tool.validate().is_ok());
    }

    #[test]
    fn test_with_default_clears_required() {
        let param = ToolParameter::required("limit", "Max rows")
            .with_type("integer")
            .with_default(10);
        assert!(!param.required);
        assert_eq!(param.default, Some(json!(10)));
    }

    #[test]
    fn test_validate_rejects_unsupported_type() {
        let tool = ToolDefinition::new("t", "test")
            .with_parameter(ToolParameter::required("id", "id").with_type("uuid"));
        let err = tool.validate().unwrap_err();
        assert!(matches!(err, SchemaBuildError::UnsupportedType { ref type_tag, .. } if type_tag == "uuid"));
    }

    #[test]
    fn test_validate_rejects_duplicate_parameter() {
        let tool = ToolDefinition::new("t", "test")
            .with_parameter(ToolParameter::required("id", "id"))
            .with_parameter(ToolParameter::optional("id", "again"));
        assert!(matches!(
            tool.validate(),
            Err(SchemaBuildError::DuplicateParameter { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_required_with_default() {
        let mut param = ToolParameter::optional("n", "n").with_default("x");
        param.required = true;
        let tool = ToolDefinition::new("t", "test").with_parameter(param);
        assert!(matches!(
            tool.validate(),
            Err(SchemaBuildError::RequiredWithDefault { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_default_type_mismatch() {
        let tool = ToolDefinition::new("t", "test").with_parameter(
            ToolParameter::optional("n", "n")
                .with_type("integer")
                .with_default("ten"),
        );
        assert!(matches!(
            tool.validate(),
            Err(SchemaBuildError::DefaultTypeMismatch {
                expected: ParamType::Integer,
                ..
            })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_name() {
        let tool = ToolDefinition::new("  ", "blank");
        assert!(matches!(tool.validate(), Err(SchemaBuildError::EmptyToolName)));
    }

    #[test]
    fn test_tool_call() {
        let call = ToolCall::new("c1", "lookup_balance").with_arg("account_id", "A1");

        assert_eq!(call.id, "c1");
        assert_eq!(call.tool_name, "lookup_balance");
        assert_eq!(call.arguments, json!({"account_id": "A1"}));
    }
}
