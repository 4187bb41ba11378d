//! OpenAI-compatible chat-completions client
//!
//! Implements [`ModelClient`] over HTTP. The endpoint is stateless, so every
//! call carries the full transcript plus the advertised tool list.

use super::types::{self, OpenAiError};
use async_trait::async_trait;
use relay_application::ports::model_client::{GatewayError, ModelClient, ModelRequest};
use relay_domain::LlmResponse;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Connection settings for an OpenAI-compatible endpoint
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    /// Base URL without the `/chat/completions` suffix
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub request_timeout: Duration,
}

impl OpenAiConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            api_key: None,
            request_timeout: Duration::from_secs(120),
        }
    }

    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl From<OpenAiError> for GatewayError {
    fn from(err: OpenAiError) -> Self {
        match err {
            OpenAiError::Transport(e) if e.is_timeout() => GatewayError::Timeout,
            OpenAiError::Transport(e) => GatewayError::ConnectionError(e.to_string()),
            OpenAiError::Status { status, body } => match status {
                401 | 403 => GatewayError::Unauthorized(body),
                429 => GatewayError::RateLimited(body),
                _ => GatewayError::RequestFailed(format!("HTTP {}: {}", status, body)),
            },
            OpenAiError::Api(message) => GatewayError::RequestFailed(message),
            OpenAiError::MalformedResponse(message) => GatewayError::InvalidResponse(message),
            other => GatewayError::Other(other.to_string()),
        }
    }
}

/// Model client for any endpoint speaking the chat-completions protocol
pub struct OpenAiCompatibleClient {
    http: Client,
    config: OpenAiConfig,
}

impl OpenAiCompatibleClient {
    pub fn new(config: OpenAiConfig) -> Result<Self, OpenAiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| OpenAiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, config })
    }

    /// Read an API key from an environment variable.
    ///
    /// Returns [`OpenAiError::MissingApiKey`] when the variable is unset.
    pub fn api_key_from_env(var: &str) -> Result<String, OpenAiError> {
        std::env::var(var).map_err(|_| OpenAiError::MissingApiKey(var.to_string()))
    }

    pub fn config(&self) -> &OpenAiConfig {
        &self.config
    }

    async fn post(&self, payload: &Value) -> Result<Value, OpenAiError> {
        let mut request = self.http.post(self.config.endpoint()).json(payload);
        if let Some(key) = &self.config.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OpenAiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }
}

#[async_trait]
impl ModelClient for OpenAiCompatibleClient {
    fn model_name(&self) -> &str {
        &self.config.model
    }

    async fn complete(&self, request: ModelRequest<'_>) -> Result<LlmResponse, GatewayError> {
        let payload = types::build_payload(&self.config.model, request.transcript, request.tools);

        debug!(
            model = %self.config.model,
            messages = request.transcript.len(),
            tools = request.tools.len(),
            "Calling chat completions"
        );

        let body = self.post(&payload).await?;
        let response = types::response_from_wire(&body)?;

        debug!(
            tool_calls = response.tool_calls().len(),
            stop_reason = ?response.stop_reason,
            "Model responded"
        );

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trims_trailing_slash() {
        let config = OpenAiConfig::new("http://localhost:11434/v1/", "llama3");
        assert_eq!(config.endpoint(), "http://localhost:11434/v1/chat/completions");
    }

    #[test]
    fn test_status_mapping() {
        let unauthorized: GatewayError = OpenAiError::Status {
            status: 401,
            body: String::new(),
        }
        .into();
        assert!(matches!(unauthorized, GatewayError::Unauthorized(_)));
        assert!(!unauthorized.is_retryable());

        let limited: GatewayError = OpenAiError::Status {
            status: 429,
            body: String::new(),
        }
        .into();
        assert!(matches!(limited, GatewayError::RateLimited(_)));

        let server: GatewayError = OpenAiError::Status {
            status: 503,
            body: "overloaded".to_string(),
        }
        .into();
        assert!(matches!(server, GatewayError::RequestFailed(ref m) if m.contains("503")));
        assert!(server.is_retryable());
    }

    #[test]
    fn test_malformed_maps_to_invalid_response() {
        let err: GatewayError = OpenAiError::MalformedResponse("no choices".to_string()).into();
        assert!(matches!(err, GatewayError::InvalidResponse(_)));
    }

    #[test]
    fn test_missing_api_key() {
        let err = OpenAiCompatibleClient::api_key_from_env("TOOL_RELAY_TEST_UNSET_KEY_VAR")
            .unwrap_err();
        assert!(matches!(err, OpenAiError::MissingApiKey(_)));
    }

    #[test]
    fn test_client_reports_model_name() {
        let client =
            OpenAiCompatibleClient::new(OpenAiConfig::new("http://localhost:1", "gpt-4o-mini"))
                .unwrap();
        assert_eq!(client.model_name(), "gpt-4o-mini");
    }
}
