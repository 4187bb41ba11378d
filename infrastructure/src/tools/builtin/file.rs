//! File tool: read_file

use async_trait::async_trait;
use relay_domain::{HandlerError, Tool, ToolArguments, ToolDefinition, ToolParameter};
use serde_json::{Value, json};
use std::path::Path;
use tokio::io::AsyncReadExt;

pub const READ_FILE: &str = "read_file";

/// Bytes returned when the caller gives no `max_bytes`
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024;

/// Hard ceiling on `max_bytes` (10 MB)
const MAX_READ_SIZE: u64 = 10 * 1024 * 1024;

/// Reads a text file, truncated to `max_bytes`.
///
/// Output: `{"path", "content", "bytes", "truncated"}`. Invalid UTF-8 is
/// replaced rather than rejected. A cut never splits a character: a
/// partial sequence at the end is dropped.
pub struct ReadFileTool {
    definition: ToolDefinition,
}

impl ReadFileTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(
                READ_FILE,
                "Read the contents of a text file at the specified path",
            )
            .with_parameter(
                ToolParameter::required("path", "Path to the file to read").with_type("path"),
            )
            .with_parameter(
                ToolParameter::optional("max_bytes", "Maximum number of bytes to return")
                    .with_type("integer")
                    .with_default(DEFAULT_MAX_BYTES),
            ),
        }
    }
}

impl Default for ReadFileTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, args: ToolArguments) -> Result<Value, HandlerError> {
        let path_str = args
            .get("path")
            .and_then(Value::as_str)
            .ok_or("path must be a string")?;
        let max_bytes = match args.get("max_bytes") {
            None | Some(Value::Null) => DEFAULT_MAX_BYTES,
            Some(value) => match value.as_u64() {
                Some(n) if n > 0 => n.min(MAX_READ_SIZE),
                _ => {
                    return Err(HandlerError::new(format!(
                        "max_bytes must be a positive integer, got {}",
                        value
                    )));
                }
            },
        };

        let path = Path::new(path_str);
        let metadata = tokio::fs::metadata(path)
            .await
            .map_err(|e| HandlerError::new(format!("{}: {}", path_str, e)))?;
        if !metadata.is_file() {
            return Err(HandlerError::new(format!("'{}' is not a file", path_str)));
        }

        let file = tokio::fs::File::open(path)
            .await
            .map_err(|e| HandlerError::new(format!("{}: {}", path_str, e)))?;
        let mut buf = Vec::new();
        file.take(max_bytes).read_to_end(&mut buf).await?;

        let truncated = metadata.len() > buf.len() as u64;
        if truncated {
            buf.truncate(complete_prefix_len(&buf));
        }

        Ok(json!({
            "path": path_str,
            "content": String::from_utf8_lossy(&buf),
            "bytes": buf.len(),
            "truncated": truncated,
        }))
    }
}

/// Length of `buf` without a trailing incomplete UTF-8 sequence
fn complete_prefix_len(buf: &[u8]) -> usize {
    for back in 1..=buf.len().min(4) {
        let start = buf.len() - back;
        let lead = buf[start];
        if lead & 0xC0 == 0x80 {
            // continuation byte, keep looking for the lead
            continue;
        }
        let width = match lead {
            0xC0..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF7 => 4,
            _ => 1,
        };
        return if back < width { start } else { buf.len() };
    }
    buf.len()
}
