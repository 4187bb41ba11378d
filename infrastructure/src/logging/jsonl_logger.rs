//! JSONL file writer for conversation events.
//!
//! Every [`ConversationEvent`] becomes one line:
//!
//! ```json
//! {"type":"model_response","round":1,"text":"","tool_calls":[...],"stop_reason":"tool_use","conversation":"20261018T091502.117Z","timestamp":"2026-10-18T09:15:02.412Z"}
//! ```
//!
//! The file is opened in append mode; the `conversation` field tells runs
//! apart.

use relay_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use serde_json::Value;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// JSONL conversation logger, one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Each record is flushed as it
/// is written so a crashed run still leaves a readable log.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    conversation_id: String,
}

impl JsonlConversationLogger {
    /// Open (or create) the log file for appending.
    ///
    /// Parent directories are created as needed.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(path)?;

        Ok(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            conversation_id: chrono::Utc::now()
                .format("%Y%m%dT%H%M%S%.3fZ")
                .to_string(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier stamped on every record written by this logger
    pub fn conversation_id(&self) -> &str {
        &self.conversation_id
    }

    /// The event's own fields plus `conversation` and `timestamp`
    fn record(&self, event: &ConversationEvent) -> serde_json::Result<Value> {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let Value::Object(mut map) = serde_json::to_value(event)? else {
            return Err(serde::ser::Error::custom(format!(
                "{} event did not serialize to an object",
                event.kind()
            )));
        };
        map.insert(
            "conversation".to_string(),
            Value::String(self.conversation_id.clone()),
        );
        map.insert("timestamp".to_string(), Value::String(timestamp));
        Ok(Value::Object(map))
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let line = match self.record(&event).and_then(|record| serde_json::to_string(&record)) {
            Ok(line) => line,
            Err(e) => {
                warn!("Could not encode {} event: {}", event.kind(), e);
                return;
            }
        };

        if let Ok(mut writer) = self.writer.lock()
            && let Err(e) = writeln!(writer, "{}", line).and_then(|_| writer.flush())
        {
            warn!("Could not write conversation log {}: {}", self.path.display(), e);
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_application::StopCause;
    use relay_domain::{ToolCall, ToolResult};
    use serde_json::json;

    fn read_lines(path: &Path) -> Vec<Value> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|l| serde_json::from_str(l).unwrap())
            .collect()
    }

    #[test]
    fn test_writes_one_record_per_event() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("conversation.jsonl");
        let logger = JsonlConversationLogger::open(&path).unwrap();

        logger.log(ConversationEvent::ModelResponse {
            round: 1,
            text: "checking".to_string(),
            tool_calls: vec![ToolCall::new("c1", "lookup_balance").with_arg("account_id", "A1")],
            stop_reason: None,
        });
        logger.log(ConversationEvent::ToolResult {
            round: 1,
            result: ToolResult::success("c1", "lookup_balance", json!({ "balance": 42 })),
        });
        logger.log(ConversationEvent::FinalAnswer {
            rounds: 2,
            stop: StopCause::Answered,
            answer: "Your balance is 42.".to_string(),
        });

        let lines = read_lines(&path);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0]["type"], "model_response");
        assert_eq!(lines[0]["round"], 1);
        assert_eq!(lines[0]["tool_calls"][0]["id"], "c1");
        assert_eq!(lines[0]["conversation"], logger.conversation_id());
        assert!(lines[0]["timestamp"].is_string());
        assert_eq!(lines[1]["type"], "tool_result");
        assert_eq!(lines[1]["result"]["call_id"], "c1");
        assert_eq!(lines[2]["type"], "final_answer");
        assert_eq!(lines[2]["stop"], "answered");
    }

    #[test]
    fn test_appends_across_loggers() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("conversation.jsonl");

        {
            let first = JsonlConversationLogger::open(&path).unwrap();
            first.log(ConversationEvent::Cancelled { round: 0 });
        }
        let second = JsonlConversationLogger::open(&path).unwrap();
        second.log(ConversationEvent::Started {
            model: "gpt-4o-mini".to_string(),
            tools: 1,
            max_rounds: 10,
        });

        assert_eq!(read_lines(&path).len(), 2);
        assert_eq!(second.path(), path.as_path());
    }

    #[test]
    fn test_open_fails_on_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(JsonlConversationLogger::open(dir.path()).is_err());
    }
}
