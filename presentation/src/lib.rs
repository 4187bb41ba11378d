//! Presentation layer for tool-relay
//!
//! This crate contains CLI definitions, the answer formatter and the
//! console renderer for tool status events.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat};
pub use output::console::ConsoleFormatter;
pub use progress::status_printer::{StatusPrinter, args_preview};
