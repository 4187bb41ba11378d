//! Model client port
//!
//! Defines the interface for sending a transcript plus the advertised tool
//! schemas to a language-model backend.

use async_trait::async_trait;
use relay_domain::{LlmResponse, Transcript};
use thiserror::Error;

/// Errors that can occur while talking to the model backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Other error: {0}")]
    Other(String),
}

impl GatewayError {
    /// Whether another attempt could plausibly succeed.
    ///
    /// Credential problems are permanent; everything else (transport
    /// failures, 5xx, 429, garbled bodies) is worth retrying.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, GatewayError::Unauthorized(_))
    }
}

/// One model call: the full transcript and the advertised tools.
#[derive(Debug, Clone, Copy)]
pub struct ModelRequest<'a> {
    pub transcript: &'a Transcript,
    /// Tool schemas in registration order
    pub tools: &'a [serde_json::Value],
}

/// Client for a language-model backend
///
/// Implementations (adapters) live in the infrastructure layer. A response
/// carrying no tool use blocks is the final answer.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Model identifier, for logs
    fn model_name(&self) -> &str;

    async fn complete(&self, request: ModelRequest<'_>) -> Result<LlmResponse, GatewayError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(GatewayError::Timeout.is_retryable());
        assert!(GatewayError::RateLimited("429".into()).is_retryable());
        assert!(GatewayError::ConnectionError("reset".into()).is_retryable());
        assert!(!GatewayError::Unauthorized("bad key".into()).is_retryable());
    }
}
