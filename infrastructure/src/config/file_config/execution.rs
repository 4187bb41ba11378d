//! Execution configuration from TOML (`[execution]` section)

use relay_application::{ExecutionParams, RetryPolicy};
use relay_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::sync::Semaphore;

const MAX_SENSIBLE_ROUNDS: u32 = 100;
const MAX_SENSIBLE_CONCURRENCY: usize = 64;
const MAX_SENSIBLE_RETRIES: u32 = 10;

/// Raw execution configuration
///
/// ```toml
/// [execution]
/// max_rounds = 10
/// max_concurrent_tools = 4
/// tool_timeout_secs = 30
///
/// [execution.tool_timeouts]
/// read_file = 5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileExecutionConfig {
    pub max_rounds: u32,
    pub max_concurrent_tools: usize,
    /// Default per-tool timeout
    pub tool_timeout_secs: u64,
    /// Per-tool timeout overrides in seconds, keyed by canonical tool name
    pub tool_timeouts: BTreeMap<String, u64>,
    /// Model call retries after the first attempt
    pub model_retries: u32,
    pub retry_initial_backoff_ms: u64,
    pub retry_max_backoff_ms: u64,
    /// Bounded status-event queue size
    pub status_queue_capacity: usize,
}

impl Default for FileExecutionConfig {
    fn default() -> Self {
        let params = ExecutionParams::default();
        Self {
            max_rounds: params.max_rounds,
            max_concurrent_tools: params.max_concurrent_tools,
            tool_timeout_secs: params.default_tool_timeout.as_secs(),
            tool_timeouts: BTreeMap::new(),
            model_retries: params.retry.max_retries,
            retry_initial_backoff_ms: params.retry.initial_backoff.as_millis() as u64,
            retry_max_backoff_ms: params.retry.max_backoff.as_millis() as u64,
            status_queue_capacity: crate::status::DEFAULT_STATUS_CAPACITY,
        }
    }
}

impl FileExecutionConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        let zero_checks = [
            ("execution.max_rounds", self.max_rounds == 0),
            ("execution.max_concurrent_tools", self.max_concurrent_tools == 0),
            ("execution.tool_timeout_secs", self.tool_timeout_secs == 0),
            ("execution.status_queue_capacity", self.status_queue_capacity == 0),
        ];
        for (field, is_zero) in zero_checks {
            if is_zero {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroLimit,
                    field,
                    "must be at least 1",
                ));
            }
        }

        for (tool, secs) in &self.tool_timeouts {
            if *secs == 0 {
                issues.push(ConfigIssue::error(
                    ConfigIssueCode::ZeroLimit,
                    format!("execution.tool_timeouts.{}", tool),
                    "must be at least 1",
                ));
            }
        }

        if self.retry_max_backoff_ms < self.retry_initial_backoff_ms {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvertedBackoff,
                "execution.retry_max_backoff_ms",
                format!(
                    "{} is below retry_initial_backoff_ms ({})",
                    self.retry_max_backoff_ms, self.retry_initial_backoff_ms
                ),
            ));
        }

        if self.max_rounds > MAX_SENSIBLE_ROUNDS {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ExcessiveValue,
                "execution.max_rounds",
                format!("{} rounds is unusually high", self.max_rounds),
            ));
        }
        if self.max_concurrent_tools > Semaphore::MAX_PERMITS {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ExcessiveValue,
                "execution.max_concurrent_tools",
                format!(
                    "{} exceeds the supported maximum of {}",
                    self.max_concurrent_tools,
                    Semaphore::MAX_PERMITS
                ),
            ));
        } else if self.max_concurrent_tools > MAX_SENSIBLE_CONCURRENCY {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ExcessiveValue,
                "execution.max_concurrent_tools",
                format!("{} concurrent tools is unusually high", self.max_concurrent_tools),
            ));
        }
        if self.status_queue_capacity > crate::status::MAX_STATUS_CAPACITY {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ExcessiveValue,
                "execution.status_queue_capacity",
                format!(
                    "{} exceeds the supported maximum of {}",
                    self.status_queue_capacity,
                    crate::status::MAX_STATUS_CAPACITY
                ),
            ));
        }
        if self.model_retries > MAX_SENSIBLE_RETRIES {
            issues.push(ConfigIssue::warning(
                ConfigIssueCode::ExcessiveValue,
                "execution.model_retries",
                format!("{} retries is unusually high", self.model_retries),
            ));
        }

        issues
    }

    /// Convert to the application-layer loop parameters
    pub fn to_execution_params(&self) -> ExecutionParams {
        let retry = RetryPolicy::default()
            .with_max_retries(self.model_retries)
            .with_initial_backoff(Duration::from_millis(self.retry_initial_backoff_ms))
            .with_max_backoff(Duration::from_millis(self.retry_max_backoff_ms));

        let mut params = ExecutionParams::default()
            .with_max_rounds(self.max_rounds)
            .with_max_concurrent_tools(self.max_concurrent_tools)
            .with_default_tool_timeout(Duration::from_secs(self.tool_timeout_secs))
            .with_retry(retry);
        for (tool, secs) in &self.tool_timeouts {
            params = params.with_tool_timeout(tool.clone(), Duration::from_secs(*secs));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_execution_params() {
        let config = FileExecutionConfig::default();
        assert!(config.validate().is_empty());

        let params = config.to_execution_params();
        let defaults = ExecutionParams::default();
        assert_eq!(params.max_rounds, defaults.max_rounds);
        assert_eq!(params.max_concurrent_tools, defaults.max_concurrent_tools);
        assert_eq!(params.default_tool_timeout, defaults.default_tool_timeout);
        assert_eq!(params.retry, defaults.retry);
    }

    #[test]
    fn test_tool_timeouts_convert() {
        let mut config = FileExecutionConfig::default();
        config.tool_timeouts.insert("read_file".to_string(), 5);

        let params = config.to_execution_params();
        assert_eq!(params.timeout_for("read_file"), Duration::from_secs(5));
        assert_eq!(params.timeout_for("current_time"), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_limits_are_errors() {
        let mut config = FileExecutionConfig {
            max_rounds: 0,
            max_concurrent_tools: 0,
            ..Default::default()
        };
        config.tool_timeouts.insert("slow".to_string(), 0);

        let issues = config.validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "execution.max_rounds",
                "execution.max_concurrent_tools",
                "execution.tool_timeouts.slow",
            ]
        );
        assert!(issues.iter().all(|i| i.is_error()));
    }

    #[test]
    fn test_inverted_backoff() {
        let config = FileExecutionConfig {
            retry_initial_backoff_ms: 2000,
            retry_max_backoff_ms: 100,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].code, ConfigIssueCode::InvertedBackoff);
    }

    #[test]
    fn test_excessive_values_are_warnings() {
        let config = FileExecutionConfig {
            max_rounds: 500,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }

    #[test]
    fn test_values_beyond_channel_limits_are_errors() {
        let config = FileExecutionConfig {
            max_concurrent_tools: usize::MAX,
            status_queue_capacity: usize::MAX,
            ..Default::default()
        };
        let issues = config.validate();
        let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec![
                "execution.max_concurrent_tools",
                "execution.status_queue_capacity"
            ]
        );
        assert!(issues.iter().all(|i| i.is_error()));
        assert!(issues.iter().all(|i| i.code == ConfigIssueCode::ExcessiveValue));
    }

    #[test]
    fn test_high_concurrency_below_limit_is_warning() {
        let config = FileExecutionConfig {
            max_concurrent_tools: 1000,
            ..Default::default()
        };
        let issues = config.validate();
        assert_eq!(issues.len(), 1);
        assert!(!issues[0].is_error());
    }
}
