//! Progress reporting for tool execution

pub mod status_printer;
