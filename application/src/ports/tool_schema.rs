//! Tool schema conversion port.
//!
//! Separates "which tools exist" (domain registry) from "how they are
//! described to the model" (infrastructure). Conversion only fails on
//! malformed declarations, which registration already rejects.

use relay_domain::{SchemaBuildError, ToolDefinition, ToolRegistry};

/// Port for converting tool definitions to the advertised JSON Schema form.
pub trait ToolSchemaPort: Send + Sync {
    /// Convert a single tool definition. Must be deterministic.
    fn tool_to_schema(&self, tool: &ToolDefinition) -> Result<serde_json::Value, SchemaBuildError>;

    /// Convert every registered tool, in registration order.
    fn all_tools_schema(
        &self,
        registry: &ToolRegistry,
    ) -> Result<Vec<serde_json::Value>, SchemaBuildError> {
        registry
            .definitions()
            .map(|definition| self.tool_to_schema(definition))
            .collect()
    }
}
