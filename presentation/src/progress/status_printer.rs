//! Console rendering of tool status events
//!
//! Drains the status channel on its own task and writes one line per event
//! to stderr, so stdout stays reserved for the answer.

use colored::Colorize;
use relay_application::StatusEvent;
use relay_domain::ToolOutcome;
use serde_json::Value;
use tokio::sync::mpsc::Receiver;

const PREVIEW_MAX_CHARS: usize = 50;

/// Argument keys shown in preference to others
const PREVIEW_KEYS: &[&str] = &["path", "command", "pattern", "query", "url", "format"];

/// Short preview of tool-call arguments.
///
/// Looks for well-known keys first, then falls back to the first string
/// value found.
pub fn args_preview(arguments: &Value) -> String {
    let Some(map) = arguments.as_object() else {
        return String::new();
    };

    let preferred = PREVIEW_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_str));
    let value = preferred.or_else(|| map.values().find_map(Value::as_str));

    match value {
        Some(s) => truncate_preview(s),
        None => String::new(),
    }
}

/// First `PREVIEW_MAX_CHARS` characters, with an ellipsis when cut
fn truncate_preview(s: &str) -> String {
    match s.char_indices().nth(PREVIEW_MAX_CHARS) {
        Some((end, _)) => format!("{}…", &s[..end]),
        None => s.to_string(),
    }
}

/// Renders [`StatusEvent`]s as colored console lines
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusPrinter {
    show_call_ids: bool,
}

impl StatusPrinter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `[call_id]` to every line (useful with -v)
    pub fn with_call_ids(mut self, show: bool) -> Self {
        self.show_call_ids = show;
        self
    }

    pub fn render(&self, event: &StatusEvent) -> String {
        let line = match event {
            StatusEvent::ToolCallStarted {
                tool_name,
                arguments,
                ..
            } => {
                let preview = args_preview(arguments);
                if preview.is_empty() {
                    format!("{} {}", "->".cyan(), tool_name.bold())
                } else {
                    format!("{} {} {}", "->".cyan(), tool_name.bold(), preview.dimmed())
                }
            }
            StatusEvent::ToolCallFinished {
                tool_name,
                duration_ms,
                outcome,
                ..
            } => match outcome {
                ToolOutcome::Payload(_) => format!(
                    "  {} {} {}",
                    "v".green(),
                    tool_name,
                    format!("({}ms)", duration_ms).dimmed()
                ),
                ToolOutcome::Error(error) => format!(
                    "  {} {} {}: {} {}",
                    "x".red(),
                    tool_name,
                    error.kind.code().red(),
                    error.message,
                    format!("({}ms)", duration_ms).dimmed()
                ),
            },
        };

        if self.show_call_ids {
            format!("{} {}", line, format!("[{}]", event.call_id()).dimmed())
        } else {
            line
        }
    }

    /// Print events until every sender is dropped; returns the number printed
    pub async fn run(self, mut events: Receiver<StatusEvent>) -> usize {
        let mut printed = 0;
        while let Some(event) = events.recv().await {
            eprintln!("{}", self.render(&event));
            printed += 1;
        }
        printed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_domain::{ToolError, ToolResult};
    use serde_json::json;
    use tokio::sync::mpsc;

    fn plain(s: String) -> String {
        // Strip ANSI escapes so assertions do not depend on terminal detection
        let mut out = String::new();
        let mut in_escape = false;
        for c in s.chars() {
            match (in_escape, c) {
                (false, '\u{1b}') => in_escape = true,
                (true, 'm') => in_escape = false,
                (true, _) => {}
                (false, c) => out.push(c),
            }
        }
        out
    }

    #[test]
    fn test_path_key_preferred() {
        let args = json!({ "other": "ignored", "path": "src/main.rs" });
        assert_eq!(args_preview(&args), "src/main.rs");
    }

    #[test]
    fn test_fallback_to_first_string() {
        let args = json!({ "count": 3, "account_id": "A1" });
        assert_eq!(args_preview(&args), "A1");
    }

    #[test]
    fn test_no_string_values() {
        assert_eq!(args_preview(&json!({ "n": 1 })), "");
        assert_eq!(args_preview(&Value::Null), "");
    }

    #[test]
    fn test_long_value_truncated() {
        let long = "x".repeat(80);
        let preview = args_preview(&json!({ "path": long }));
        assert!(preview.ends_with('…'));
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS + 1);
    }

    #[test]
    fn test_multibyte_value_cut_on_char_boundary() {
        let long = "残高".repeat(40);
        let preview = truncate_preview(&long);
        assert_eq!(preview.chars().count(), PREVIEW_MAX_CHARS + 1);
        assert!(preview.starts_with("残高残高"));
        assert!(preview.ends_with('…'));

        let exact = "é".repeat(PREVIEW_MAX_CHARS);
        assert_eq!(truncate_preview(&exact), exact);
    }

    #[test]
    fn test_render_started() {
        let mut args = serde_json::Map::new();
        args.insert("path".to_string(), json!("Cargo.toml"));
        let event = StatusEvent::started("c1", "read_file", &args);

        let line = plain(StatusPrinter::new().render(&event));
        assert_eq!(line, "-> read_file Cargo.toml");
    }

    #[test]
    fn test_render_finished() {
        let ok = StatusEvent::finished(
            &ToolResult::success("c1", "read_file", json!({})).with_duration(12),
        );
        assert_eq!(plain(StatusPrinter::new().render(&ok)), "  v read_file (12ms)");

        let failed = StatusEvent::finished(
            &ToolResult::failure("c2", "slow", ToolError::timeout("slow", 50)).with_duration(50),
        );
        let line = plain(StatusPrinter::new().with_call_ids(true).render(&failed));
        assert!(line.starts_with("  x slow TIMEOUT: "));
        assert!(line.ends_with("(50ms) [c2]"));
    }

    #[tokio::test]
    async fn test_run_drains_until_closed() {
        let (tx, rx) = mpsc::channel(8);
        let args = serde_json::Map::new();
        tx.send(StatusEvent::started("c1", "current_time", &args))
            .await
            .unwrap();
        tx.send(StatusEvent::finished(&ToolResult::success(
            "c1",
            "current_time",
            json!({}),
        )))
        .await
        .unwrap();
        drop(tx);

        assert_eq!(StatusPrinter::new().run(rx).await, 2);
    }
}
