//! Tool Registry
//!
//! [`ToolRegistry`] holds the callable tools of one agent process. It is a
//! pure lookup structure: tools are registered during initialization, then
//! the registry is shared read-only (typically behind an `Arc`) by every
//! conversation.
//!
//! # Registration order
//!
//! [`list()`](ToolRegistry::list) returns tools in the order they were
//! registered, so the advertised schema set is stable between runs.
//!
//! # Aliases
//!
//! Models sometimes call a tool by a plausible but wrong name (`bash`
//! instead of `run_command`). An alias maps such a name to a canonical tool
//! so the call resolves without another model round. Canonical names always
//! win over aliases.

use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;

use super::entities::ToolDefinition;
use super::error::SchemaBuildError;
use super::handler::Tool;

/// Errors raised by registry operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    #[error("Invalid tool declaration: {0}")]
    Schema(#[from] SchemaBuildError),
}

/// Registry of callable tools, in registration order
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    /// Tool name -> index into `tools`
    index: HashMap<String, usize>,
    /// Alias -> canonical name mapping (e.g. "bash" -> "run_command")
    aliases: HashMap<String, String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool.
    ///
    /// Fails if the declaration is malformed or the name is already taken
    /// (by a tool or an alias).
    pub fn register(&mut self, tool: impl Tool + 'static) -> Result<(), RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    /// Register a tool (Arc version)
    pub fn register_arc(&mut self, tool: Arc<dyn Tool>) -> Result<(), RegistryError> {
        let definition = tool.definition();
        definition.validate()?;

        let name = definition.name.clone();
        if self.index.contains_key(&name) || self.aliases.contains_key(&name) {
            return Err(RegistryError::DuplicateTool(name));
        }

        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Builder-style registration
    pub fn with_tool(mut self, tool: impl Tool + 'static) -> Result<Self, RegistryError> {
        self.register(tool)?;
        Ok(self)
    }

    /// Register an alias for an already registered tool
    pub fn register_alias(
        &mut self,
        alias: impl Into<String>,
        canonical: impl Into<String>,
    ) -> Result<(), RegistryError> {
        let alias = alias.into();
        let canonical = canonical.into();

        if !self.index.contains_key(&canonical) {
            return Err(RegistryError::ToolNotFound(canonical));
        }
        if self.index.contains_key(&alias) || self.aliases.contains_key(&alias) {
            return Err(RegistryError::DuplicateTool(alias));
        }

        self.aliases.insert(alias, canonical);
        Ok(())
    }

    /// Resolve a name: canonical names first, then aliases
    pub fn resolve<'a>(&'a self, name: &'a str) -> Option<&'a str> {
        if self.index.contains_key(name) {
            Some(name)
        } else {
            self.aliases.get(name).map(|s| s.as_str())
        }
    }

    /// Look up a tool by canonical name or alias
    pub fn lookup(&self, name: &str) -> Result<&Arc<dyn Tool>, RegistryError> {
        self.resolve(name)
            .and_then(|canonical| self.index.get(canonical))
            .map(|&i| &self.tools[i])
            .ok_or_else(|| RegistryError::ToolNotFound(name.to_string()))
    }

    /// Definition of a tool by canonical name or alias
    pub fn definition(&self, name: &str) -> Option<&ToolDefinition> {
        self.lookup(name).ok().map(|t| t.definition())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// All tools in registration order
    pub fn list(&self) -> impl Iterator<Item = &Arc<dyn Tool>> {
        self.tools.iter()
    }

    /// All definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &ToolDefinition> {
        self.tools.iter().map(|t| t.definition())
    }

    /// Canonical names in registration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions().map(|d| d.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.names().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .finish()
    }
}
