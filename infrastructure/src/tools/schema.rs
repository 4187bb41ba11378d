//! JSON Schema tool converter.
//!
//! Default implementation of [`ToolSchemaPort`]. Output per tool:
//!
//! ```json
//! {
//!   "name": "lookup_balance",
//!   "description": "...",
//!   "input_schema": {
//!     "type": "object",
//!     "properties": { "account_id": {"type": "string", "description": "..."} },
//!     "required": ["account_id"],
//!     "additionalProperties": false
//!   }
//! }
//! ```
//!
//! Properties keep declaration order (serde_json `preserve_order`), so the
//! same definition always yields byte-identical output.

use relay_application::ports::tool_schema::ToolSchemaPort;
use relay_domain::{SchemaBuildError, ToolDefinition};
use serde_json::{Map, Value, json};

/// Default implementation producing provider-neutral JSON Schema.
///
/// Type tag mapping: `"string"` and `"path"` → `"string"`; `"number"`,
/// `"integer"`, `"boolean"`, `"object"`, `"array"` map to themselves.
/// Any other tag is a [`SchemaBuildError::UnsupportedType`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSchemaToolConverter;

impl ToolSchemaPort for JsonSchemaToolConverter {
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Result<Value, SchemaBuildError> {
        tool.validate()?;

        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in &tool.parameters {
            let schema_type =
                param
                    .parsed_type()
                    .map_err(|type_tag| SchemaBuildError::UnsupportedType {
                        tool: tool.name.clone(),
                        parameter: param.name.clone(),
                        type_tag,
                    })?;

            let mut prop = Map::new();
            prop.insert("type".to_string(), json!(schema_type.as_str()));
            prop.insert("description".to_string(), json!(param.description));
            if let Some(default) = &param.default {
                prop.insert("default".to_string(), default.clone());
            }
            properties.insert(param.name.clone(), Value::Object(prop));

            if param.required {
                required.push(json!(param.name));
            }
        }

        Ok(json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": {
                "type": "object",
                "properties": properties,
                "required": required,
                "additionalProperties": false,
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::{FnTool, ToolParameter, ToolRegistry};

    fn read_file() -> ToolDefinition {
        ToolDefinition::new("read_file", "Read file contents")
            .with_parameter(ToolParameter::required("path", "File path to read").with_type("path"))
            .with_parameter(
                ToolParameter::optional("max_bytes", "Max bytes to read")
                    .with_type("integer")
                    .with_default(65536),
            )
            .with_parameter(ToolParameter::optional("encoding", "Text encoding"))
    }

    #[test]
    fn test_tool_to_schema() {
        let schema = JsonSchemaToolConverter.tool_to_schema(&read_file()).unwrap();

        assert_eq!(schema["name"], "read_file");
        assert_eq!(schema["description"], "Read file contents");
        assert_eq!(schema["input_schema"]["type"], "object");
        assert_eq!(schema["input_schema"]["additionalProperties"], false);

        let props = &schema["input_schema"]["properties"];
        assert_eq!(props["path"]["type"], "string"); // "path" maps to "string"
        assert_eq!(props["path"]["description"], "File path to read");
        assert!(props["path"].get("default").is_none());
        assert_eq!(props["max_bytes"]["type"], "integer");
        assert_eq!(props["max_bytes"]["default"], 65536);
        assert!(props["encoding"].get("default").is_none());

        assert_eq!(schema["input_schema"]["required"], json!(["path"]));
    }

    #[test]
    fn test_property_order_follows_declaration() {
        let schema = JsonSchemaToolConverter.tool_to_schema(&read_file()).unwrap();
        let keys: Vec<&String> = schema["input_schema"]["properties"]
            .as_object()
            .unwrap()
            .keys()
            .collect();
        assert_eq!(keys, vec!["path", "max_bytes", "encoding"]);
    }

    #[test]
    fn test_schema_is_deterministic() {
        let first = JsonSchemaToolConverter.tool_to_schema(&read_file()).unwrap();
        let second = JsonSchemaToolConverter.tool_to_schema(&read_file()).unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_unsupported_type_fails() {
        let tool = ToolDefinition::new("bad", "Bad tool")
            .with_parameter(ToolParameter::required("when", "Timestamp").with_type("datetime"));
        let err = JsonSchemaToolConverter.tool_to_schema(&tool).unwrap_err();
        assert!(matches!(err, SchemaBuildError::UnsupportedType { .. }));
    }

    #[test]
    fn test_all_tools_schema_in_registration_order() {
        let mut registry = ToolRegistry::new();
        for name in ["write_file", "read_file", "current_time"] {
            registry
                .register(FnTool::new(ToolDefinition::new(name, name), |_args| async {
                    Ok(json!(null))
                }))
                .unwrap();
        }

        let tools = JsonSchemaToolConverter.all_tools_schema(&registry).unwrap();
        let names: Vec<&str> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["write_file", "read_file", "current_time"]);
    }
}
