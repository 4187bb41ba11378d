//! Raw TOML configuration data types
//!
//! These structs mirror the config file exactly. Every section is
//! `#[serde(default)]`, so a partial file (or none) yields a complete config.

mod execution;
mod logging;
mod model;

pub use execution::FileExecutionConfig;
pub use logging::FileLoggingConfig;
pub use model::FileModelConfig;

use relay_domain::ConfigIssue;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration rejected by [`FileConfig::check`]
#[derive(Debug, Error)]
pub enum ConfigValidationError {
    #[error("invalid configuration:\n{}", format_issues(.0))]
    Invalid(Vec<ConfigIssue>),
}

fn format_issues(issues: &[ConfigIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("  - {}", issue))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Complete file configuration (raw TOML structure)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    /// Model endpoint settings
    pub model: FileModelConfig,
    /// Conversation loop and tool execution settings
    pub execution: FileExecutionConfig,
    /// Conversation log settings
    pub logging: FileLoggingConfig,
}

impl FileConfig {
    /// Validate the entire configuration, returning all detected issues.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = self.model.validate();
        issues.extend(self.execution.validate());
        issues
    }

    /// Render the effective configuration as TOML (for --show-config)
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Fail on any error-severity issue; otherwise return the warnings.
    pub fn check(&self) -> Result<Vec<ConfigIssue>, ConfigValidationError> {
        let (errors, warnings): (Vec<_>, Vec<_>) =
            self.validate().into_iter().partition(ConfigIssue::is_error);
        if errors.is_empty() {
            Ok(warnings)
        } else {
            Err(ConfigValidationError::Invalid(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_deserialize_full_config() {
        let toml_str = r#"
[model]
base_url = "http://localhost:11434/v1"
model = "llama3.1"
api_key_env = ""

[execution]
max_rounds = 5
max_concurrent_tools = 2
tool_timeout_secs = 10

[execution.tool_timeouts]
read_file = 3

[logging]
conversation_log = "/tmp/relay.jsonl"
"#;

        let config: FileConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.model, "llama3.1");
        assert!(config.model.api_key_env.is_empty());
        assert_eq!(config.execution.max_rounds, 5);
        assert_eq!(config.execution.tool_timeouts.get("read_file"), Some(&3));
        assert_eq!(
            config.logging.conversation_log,
            Some(PathBuf::from("/tmp/relay.jsonl"))
        );
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_deserialize_partial_config() {
        let config: FileConfig = toml::from_str("[execution]\nmax_rounds = 3\n").unwrap();
        assert_eq!(config.execution.max_rounds, 3);
        // Defaults apply elsewhere
        assert_eq!(config.execution.max_concurrent_tools, 4);
        assert_eq!(config.model, FileModelConfig::default());
        assert!(config.logging.conversation_log.is_none());
    }

    #[test]
    fn test_validate_valid_config() {
        let config = FileConfig::default();
        assert!(config.validate().is_empty());
        assert!(config.check().unwrap().is_empty());
    }

    #[test]
    fn test_check_separates_errors_from_warnings() {
        let mut config = FileConfig::default();
        config.execution.max_rounds = 1000;
        assert_eq!(config.check().unwrap().len(), 1);

        config.model.model = String::new();
        let err = config.check().unwrap_err();
        let ConfigValidationError::Invalid(errors) = &err;
        assert_eq!(errors.len(), 1);
        assert!(err.to_string().contains("model.model: must not be empty"));
    }

    #[test]
    fn test_round_trips_through_toml() {
        let config = FileConfig::default();
        let rendered = config.to_toml().unwrap();
        let parsed: FileConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
