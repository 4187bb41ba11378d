//! Tool implementations and schema conversion
//!
//! - `builtin`: tools that ship with the binary (read_file, current_time)
//! - `schema`: [`JsonSchemaToolConverter`], the advertised-schema builder

pub mod builtin;
pub mod schema;

pub use builtin::{builtin_registry, register_builtins};
pub use schema::JsonSchemaToolConverter;
