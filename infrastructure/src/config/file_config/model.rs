//! Model endpoint configuration from TOML (`[model]` section)

use crate::providers::OpenAiConfig;
use relay_domain::{ConfigIssue, ConfigIssueCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Raw model endpoint configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileModelConfig {
    /// Base URL of an OpenAI-compatible API (without `/chat/completions`)
    pub base_url: String,
    /// Model identifier sent with every request
    pub model: String,
    /// Environment variable holding the API key. Empty disables auth
    /// (local backends such as Ollama).
    pub api_key_env: String,
    /// HTTP request timeout for a single model call
    pub request_timeout_secs: u64,
}

impl Default for FileModelConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            request_timeout_secs: 120,
        }
    }
}

impl FileModelConfig {
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if self.base_url.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue,
                "model.base_url",
                "must not be empty",
            ));
        } else if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://"))
        {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::InvalidUrl,
                "model.base_url",
                format!("'{}' is not an http(s) URL", self.base_url),
            ));
        }

        if self.model.trim().is_empty() {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::EmptyValue,
                "model.model",
                "must not be empty",
            ));
        }

        if self.request_timeout_secs == 0 {
            issues.push(ConfigIssue::error(
                ConfigIssueCode::ZeroLimit,
                "model.request_timeout_secs",
                "must be at least 1",
            ));
        }

        issues
    }

    /// Client settings, with the API key already resolved by the caller
    pub fn to_openai_config(&self, api_key: Option<String>) -> OpenAiConfig {
        let config = OpenAiConfig::new(&self.base_url, &self.model)
            .with_request_timeout(Duration::from_secs(self.request_timeout_secs));
        match api_key {
            Some(key) => config.with_api_key(key),
            None => config,
        }
    }
}
