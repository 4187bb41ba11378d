//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod invoke_tool;
pub mod run_conversation;
pub(crate) mod shared;
