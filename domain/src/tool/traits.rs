//! Tool domain traits
//!
//! Contains pure domain logic for argument validation. Validation is
//! data-driven: it reads the declared [`ToolParameter`](super::entities::ToolParameter)
//! list and never looks at the handler.

use super::entities::ToolDefinition;
use super::error::{ValidationError, json_type_name};

/// Validated arguments handed to a tool handler.
///
/// Keys follow the tool's parameter declaration order; absent optional
/// parameters with a default have been filled in.
pub type ToolArguments = serde_json::Map<String, serde_json::Value>;

/// Validator for raw tool-call arguments
///
/// This is a pure domain trait that checks raw arguments against a tool
/// definition without any I/O operations.
pub trait ToolValidator {
    /// Validate raw arguments, returning the normalized argument map
    fn validate(
        &self,
        raw: &serde_json::Value,
        definition: &ToolDefinition,
    ) -> Result<ToolArguments, ValidationError>;
}

/// Default implementation of ToolValidator
#[derive(Debug, Clone, Default)]
pub struct DefaultToolValidator;

impl DefaultToolValidator {
    /// Normalize the raw payload into an object.
    ///
    /// `null` means "no arguments". A JSON string is decoded, since some
    /// wire formats transmit arguments as an encoded string.
    fn as_object(
        raw: &serde_json::Value,
        tool: &str,
    ) -> Result<ToolArguments, ValidationError> {
        match raw {
            serde_json::Value::Null => Ok(ToolArguments::new()),
            serde_json::Value::Object(map) => Ok(map.clone()),
            serde_json::Value::String(encoded) => {
                if encoded.trim().is_empty() {
                    return Ok(ToolArguments::new());
                }
                let decoded: serde_json::Value = serde_json::from_str(encoded).map_err(|e| {
                    ValidationError::MalformedArguments {
                        tool: tool.to_string(),
                        reason: e.to_string(),
                    }
                })?;
                match decoded {
                    serde_json::Value::Object(map) => Ok(map),
                    serde_json::Value::Null => Ok(ToolArguments::new()),
                    other => Err(ValidationError::NotAnObject {
                        tool: tool.to_string(),
                        found: json_type_name(&other),
                    }),
                }
            }
            other => Err(ValidationError::NotAnObject {
                tool: tool.to_string(),
                found: json_type_name(other),
            }),
        }
    }
}

impl ToolValidator for DefaultToolValidator {
    fn validate(
        &self,
        raw: &serde_json::Value,
        definition: &ToolDefinition,
    ) -> Result<ToolArguments, ValidationError> {
        let mut provided = Self::as_object(raw, &definition.name)?;

        // Unknown fields first, so a misspelled required field reports the typo
        if let Some(unknown) = provided
            .keys()
            .find(|name| definition.parameter(name).is_none())
        {
            return Err(ValidationError::UnknownParameter {
                tool: definition.name.clone(),
                parameter: unknown.clone(),
            });
        }

        let mut validated = ToolArguments::new();
        for param in &definition.parameters {
            match provided.remove(&param.name) {
                Some(value) => {
                    // Registered definitions have already passed `validate()`
                    if let Ok(expected) = param.parsed_type()
                        && !expected.matches(&value)
                    {
                        return Err(ValidationError::WrongType {
                            tool: definition.name.clone(),
                            parameter: param.name.clone(),
                            expected,
                            found: json_type_name(&value),
                        });
                    }
                    validated.insert(param.name.clone(), value);
                }
                None if param.required => {
                    return Err(ValidationError::MissingParameter {
                        tool: definition.name.clone(),
                        parameter: param.name.clone(),
                    });
                }
                None => {
                    if let Some(default) = &param.default {
                        validated.insert(param.name.clone(), default.clone());
                    }
                }
            }
        }

        Ok(validated)
    }
}
