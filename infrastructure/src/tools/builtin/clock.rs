//! Clock tool: current_time

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use relay_domain::{HandlerError, Tool, ToolArguments, ToolDefinition, ToolParameter};
use serde_json::{Value, json};
use std::fmt::Write;

pub const CURRENT_TIME: &str = "current_time";

/// Reports the current time as RFC 3339 and a Unix timestamp, plus an
/// optional strftime-formatted string.
pub struct CurrentTimeTool {
    definition: ToolDefinition,
}

impl CurrentTimeTool {
    pub fn new() -> Self {
        Self {
            definition: ToolDefinition::new(CURRENT_TIME, "Get the current date and time")
                .with_parameter(ToolParameter::optional(
                    "format",
                    "strftime format string, e.g. \"%Y-%m-%d %H:%M\"",
                ))
                .with_parameter(
                    ToolParameter::optional("utc", "Report UTC instead of local time")
                        .with_type("boolean")
                        .with_default(false),
                ),
        }
    }
}

impl Default for CurrentTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Render `now` for the tool output
fn describe<Tz: TimeZone>(now: DateTime<Tz>, format: Option<&str>) -> Result<Value, HandlerError>
where
    Tz::Offset: std::fmt::Display,
{
    let mut out = json!({
        "rfc3339": now.to_rfc3339(),
        "unix": now.timestamp(),
    });

    if let Some(format) = format {
        let mut formatted = String::new();
        // chrono reports unknown specifiers as a fmt::Error rather than panicking here
        write!(formatted, "{}", now.format(format))
            .map_err(|_| HandlerError::new(format!("invalid format string: {}", format)))?;
        out["formatted"] = Value::String(formatted);
    }

    Ok(out)
}

#[async_trait]
impl Tool for CurrentTimeTool {
    fn definition(&self) -> &ToolDefinition {
        &self.definition
    }

    async fn execute(&self, args: ToolArguments) -> Result<Value, HandlerError> {
        let format = args.get("format").and_then(Value::as_str);
        let utc = args.get("utc").and_then(Value::as_bool).unwrap_or(false);

        if utc {
            describe(Utc::now(), format)
        } else {
            describe(Local::now(), format)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_fixed_time() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        let out = describe(at, Some("%Y-%m-%d %H:%M")).unwrap();

        assert_eq!(out["rfc3339"], "2024-03-01T12:30:00+00:00");
        assert_eq!(out["unix"], 1709296200);
        assert_eq!(out["formatted"], "2024-03-01 12:30");
    }

    #[test]
    fn test_invalid_format_is_handler_error() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 30, 0).unwrap();
        assert!(describe(at, Some("%Y %")).is_err());
    }

    #[tokio::test]
    async fn test_execute_utc() {
        let mut args = ToolArguments::new();
        args.insert("utc".to_string(), json!(true));

        let out = CurrentTimeTool::new().execute(args).await.unwrap();
        assert!(out["rfc3339"].as_str().unwrap().ends_with("+00:00"));
        assert!(out.get("formatted").is_none());
    }
}
