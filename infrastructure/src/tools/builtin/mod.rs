//! Built-in tools
//!
//! Always-available tools registered by [`builtin_registry`]:
//!
//! | Tool | Aliases |
//! |------|---------|
//! | `read_file` | `cat`, `view` |
//! | `current_time` | `now`, `date` |

mod clock;
mod file;

pub use clock::{CURRENT_TIME, CurrentTimeTool};
pub use file::{DEFAULT_MAX_BYTES, READ_FILE, ReadFileTool};

use relay_domain::{RegistryError, ToolRegistry};

/// Alias → canonical name pairs for the built-in tools
pub const BUILTIN_ALIASES: &[(&str, &str)] = &[
    ("cat", READ_FILE),
    ("view", READ_FILE),
    ("now", CURRENT_TIME),
    ("date", CURRENT_TIME),
];

/// Register the built-in tools and their aliases into `registry`
pub fn register_builtins(registry: &mut ToolRegistry) -> Result<(), RegistryError> {
    registry.register(ReadFileTool::new())?;
    registry.register(CurrentTimeTool::new())?;
    for (alias, canonical) in BUILTIN_ALIASES {
        registry.register_alias(*alias, *canonical)?;
    }
    Ok(())
}

/// A fresh registry holding only the built-in tools
pub fn builtin_registry() -> Result<ToolRegistry, RegistryError> {
    let mut registry = ToolRegistry::new();
    register_builtins(&mut registry)?;
    Ok(registry)
}
