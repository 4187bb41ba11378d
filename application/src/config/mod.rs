//! Application-level configuration.
//!
//! - [`ExecutionParams`]: conversation loop control (rounds, concurrency, timeouts)
//! - [`RetryPolicy`]: model call retry with exponential backoff

pub mod execution_params;

pub use execution_params::{ExecutionParams, RetryPolicy};
