//! Execution parameters: conversation loop control.
//!
//! [`ExecutionParams`] groups the static parameters that control the loop in
//! [`ConversationOrchestrator`](crate::use_cases::run_conversation::ConversationOrchestrator)
//! and the per-call behavior of [`ToolInvoker`](crate::use_cases::invoke_tool::ToolInvoker).

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Retry policy for failed model calls.
///
/// Attempt `n` (0-based) that fails waits `initial_backoff * multiplier^n`,
/// capped at `max_backoff`, before the next attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Retries after the first attempt (`2` means 3 attempts in total).
    pub max_retries: u32,
    pub initial_backoff: Duration,
    pub multiplier: u32,
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            initial_backoff: Duration::from_millis(500),
            multiplier: 2,
            max_backoff: Duration::from_secs(8),
        }
    }
}

impl RetryPolicy {
    /// Single attempt, no retry
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::default()
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay after the failed attempt `attempt` (0-based)
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let factor = self.multiplier.max(1).saturating_pow(attempt);
        self.initial_backoff
            .checked_mul(factor)
            .unwrap_or(self.max_backoff)
            .min(self.max_backoff)
    }

    pub fn with_max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    pub fn with_initial_backoff(mut self, backoff: Duration) -> Self {
        self.initial_backoff = backoff;
        self
    }

    pub fn with_max_backoff(mut self, backoff: Duration) -> Self {
        self.max_backoff = backoff;
        self
    }
}

/// Conversation loop control parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionParams {
    /// Maximum model rounds before the conversation stops with a round limit.
    pub max_rounds: u32,
    /// Maximum tool executions in flight within one round.
    pub max_concurrent_tools: usize,
    /// Timeout applied to tools without their own override.
    pub default_tool_timeout: Duration,
    /// Per-tool timeout overrides, keyed by canonical tool name.
    pub tool_timeouts: HashMap<String, Duration>,
    pub retry: RetryPolicy,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        Self {
            max_rounds: 10,
            max_concurrent_tools: 4,
            default_tool_timeout: Duration::from_secs(30),
            tool_timeouts: HashMap::new(),
            retry: RetryPolicy::default(),
        }
    }
}

impl ExecutionParams {
    // ==================== Builder Methods ====================

    pub fn with_max_rounds(mut self, max: u32) -> Self {
        self.max_rounds = max;
        self
    }

    /// Clamped to `1..=Semaphore::MAX_PERMITS`.
    pub fn with_max_concurrent_tools(mut self, max: usize) -> Self {
        self.max_concurrent_tools = max.clamp(1, Semaphore::MAX_PERMITS);
        self
    }

    pub fn with_default_tool_timeout(mut self, timeout: Duration) -> Self {
        self.default_tool_timeout = timeout;
        self
    }

    pub fn with_tool_timeout(mut self, tool_name: impl Into<String>, timeout: Duration) -> Self {
        self.tool_timeouts.insert(tool_name.into(), timeout);
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Configured timeout for a tool (override or default)
    pub fn timeout_for(&self, tool_name: &str) -> Duration {
        self.tool_timeouts
            .get(tool_name)
            .copied()
            .unwrap_or(self.default_tool_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default() {
        let params = ExecutionParams::default();
        assert_eq!(params.max_rounds, 10);
        assert_eq!(params.max_concurrent_tools, 4);
        assert_eq!(params.default_tool_timeout, Duration::from_secs(30));
        assert_eq!(params.retry.max_retries, 2);
        assert_eq!(params.retry.max_attempts(), 3);
    }

    #[test]
    fn test_builder() {
        let params = ExecutionParams::default()
            .with_max_rounds(3)
            .with_max_concurrent_tools(0)
            .with_tool_timeout("slow_report", Duration::from_secs(120));

        assert_eq!(params.max_rounds, 3);
        assert_eq!(params.max_concurrent_tools, 1);
        assert_eq!(params.timeout_for("slow_report"), Duration::from_secs(120));
        assert_eq!(params.timeout_for("other"), Duration::from_secs(30));
    }

    #[test]
    fn test_concurrency_capped_at_semaphore_limit() {
        let params = ExecutionParams::default().with_max_concurrent_tools(usize::MAX);
        assert_eq!(params.max_concurrent_tools, Semaphore::MAX_PERMITS);
    }

    #[test]
    fn test_backoff_grows_and_caps() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff_for(0), Duration::from_millis(500));
        assert_eq!(policy.backoff_for(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff_for(2), Duration::from_millis(2000));
        assert_eq!(policy.backoff_for(4), Duration::from_secs(8));
        assert_eq!(policy.backoff_for(40), Duration::from_secs(8));
    }

    #[test]
    fn test_no_retry_policy() {
        assert_eq!(RetryPolicy::none().max_attempts(), 1);
    }
}
