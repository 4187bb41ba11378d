//! Run Conversation use case
//!
//! Drives one tool-augmented conversation: alternates model calls with
//! rounds of tool execution until the model answers without requesting
//! tools.
//!
//! # Flow
//!
//! ```text
//! Idle ─▶ AwaitingModel ─(no tool calls)─▶ Done
//!              │
//!              └─(tool calls)─▶ HasToolCalls ─▶ ExecutingTools ─▶ AwaitingModel ...
//! ```
//!
//! Model calls are strictly sequential. Tool calls within one round run
//! concurrently (bounded by `max_concurrent_tools`) and their results are
//! appended in the order the model requested them.
//!
//! Per-tool failures become error results that the model reads on its next
//! turn. Only an exhausted model retry budget aborts the conversation.

mod types;

pub use types::{ConversationOutcome, RunConversationError, RunConversationInput, StopCause};

use crate::config::ExecutionParams;
use crate::ports::conversation_logger::{
    ConversationEvent, ConversationLogger, NoConversationLogger,
};
use crate::ports::model_client::{GatewayError, ModelClient, ModelRequest};
use crate::use_cases::invoke_tool::ToolInvoker;
use crate::use_cases::shared::{cancelled, is_cancelled};
use futures::future::join_all;
use relay_domain::{
    ConversationPhase, ConversationState, LlmResponse, Message, ToolCall, ToolErrorKind,
    ToolResult,
};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Orchestrator for a single conversation.
///
/// Owns the [`ConversationState`]; nothing else mutates it. Create one
/// instance per conversation.
pub struct ConversationOrchestrator<M: ModelClient> {
    model: Arc<M>,
    invoker: Arc<ToolInvoker>,
    tool_schemas: Vec<serde_json::Value>,
    params: ExecutionParams,
    state: ConversationState,
    logger: Arc<dyn ConversationLogger>,
    cancellation_token: Option<CancellationToken>,
}

impl<M: ModelClient> ConversationOrchestrator<M> {
    /// Seed a conversation.
    ///
    /// `tool_schemas` are the advertised schemas for every tool the invoker's
    /// registry holds, in registration order.
    pub fn new(
        model: Arc<M>,
        invoker: Arc<ToolInvoker>,
        tool_schemas: Vec<serde_json::Value>,
        input: RunConversationInput,
    ) -> Self {
        Self {
            model,
            invoker,
            tool_schemas,
            params: ExecutionParams::default(),
            state: ConversationState::new(input.system_prompt, input.user_message),
            logger: Arc::new(NoConversationLogger),
            cancellation_token: None,
        }
    }

    pub fn with_params(mut self, params: ExecutionParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ConversationLogger>) -> Self {
        self.logger = logger;
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    /// Current state. Stays readable after `run` fails.
    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    /// Run the conversation to completion.
    ///
    /// Can be called once; a second call fails with `InvalidState`.
    pub async fn run(&mut self) -> Result<ConversationOutcome, RunConversationError> {
        info!(
            model = self.model.model_name(),
            tools = self.tool_schemas.len(),
            "Starting conversation"
        );
        self.logger.log(ConversationEvent::Started {
            model: self.model.model_name().to_string(),
            tools: self.tool_schemas.len(),
            max_rounds: self.params.max_rounds,
        });

        let mut latest_text = String::new();

        loop {
            if is_cancelled(&self.cancellation_token) {
                return Err(self.finish_cancelled());
            }

            if self.state.phase() == ConversationPhase::ExecutingTools
                && self.state.round() >= self.params.max_rounds
            {
                warn!(
                    rounds = self.state.round(),
                    "Round limit reached, stopping conversation"
                );
                self.state.advance(ConversationPhase::Done)?;
                return Ok(self.finish(latest_text, StopCause::RoundLimit));
            }

            self.state.advance(ConversationPhase::AwaitingModel)?;
            let round = self.state.round();
            debug!(round, "Awaiting model");

            let response = self.complete_with_retry().await?;
            let text = response.text_content();
            let calls = response.tool_calls();

            self.logger.log(ConversationEvent::ModelResponse {
                round,
                text: text.clone(),
                tool_calls: calls.clone(),
                stop_reason: response.stop_reason.clone(),
            });

            if calls.is_empty() {
                self.state.record_assistant(Message::assistant(text.clone()))?;
                self.state.advance(ConversationPhase::Done)?;
                return Ok(self.finish(text, StopCause::Answered));
            }

            debug!(round, calls = calls.len(), "Model requested tools");
            self.state
                .record_assistant(Message::assistant_with_tool_calls(text.clone(), calls.clone()))?;
            self.state.advance(ConversationPhase::HasToolCalls)?;
            if !text.is_empty() {
                latest_text = text;
            }

            self.state.advance(ConversationPhase::ExecutingTools)?;
            let results = self.execute_round(&calls).await;

            for result in &results {
                self.logger.log(ConversationEvent::ToolResult {
                    round,
                    result: result.clone(),
                });
            }
            self.state.record_tool_results(&results)?;

            if results
                .iter()
                .any(|r| r.error_kind() == Some(ToolErrorKind::Cancelled))
            {
                return Err(self.finish_cancelled());
            }
        }
    }

    /// Call the model, retrying retryable failures with backoff.
    ///
    /// The transcript is not touched here, so a failed round leaves it
    /// exactly as it was.
    async fn complete_with_retry(&mut self) -> Result<LlmResponse, RunConversationError> {
        let policy = self.params.retry.clone();
        let mut attempts = 0;

        loop {
            let request = ModelRequest {
                transcript: self.state.transcript(),
                tools: &self.tool_schemas,
            };
            let error = match self.model.complete(request).await {
                Ok(response) => match check_call_ids(&response) {
                    Ok(()) => return Ok(response),
                    Err(e) => e,
                },
                Err(e) => e,
            };
            attempts += 1;

            if !error.is_retryable() || attempts >= policy.max_attempts() {
                warn!(attempts, error = %error, "Model unavailable");
                return Err(RunConversationError::ModelUnavailable {
                    attempts,
                    last_error: error,
                });
            }

            let delay = policy.backoff_for(attempts - 1);
            warn!(
                attempts,
                retry_in_ms = delay.as_millis() as u64,
                error = %error,
                "Model call failed, retrying"
            );

            let interrupted = tokio::select! {
                _ = cancelled(&self.cancellation_token) => true,
                _ = tokio::time::sleep(delay) => false,
            };
            if interrupted {
                return Err(self.finish_cancelled());
            }
        }
    }

    /// Execute every call of the round and return results in call order.
    ///
    /// Calls still waiting for a concurrency slot when cancellation is
    /// requested are never dispatched and get a `CANCELLED` result.
    async fn execute_round(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let permits = self
            .params
            .max_concurrent_tools
            .clamp(1, Semaphore::MAX_PERMITS);
        let semaphore = Semaphore::new(permits);
        let semaphore = &semaphore;
        let token = &self.cancellation_token;
        let invoker = &self.invoker;

        let executions = calls.iter().map(|call| async move {
            let permit = tokio::select! {
                biased;
                _ = cancelled(token) => None,
                permit = semaphore.acquire() => permit.ok(),
            };
            match permit {
                Some(_permit) if !is_cancelled(token) => invoker.invoke(call).await,
                _ => {
                    debug!(call_id = %call.id, "Skipping tool call after cancellation");
                    ToolInvoker::cancelled(call)
                }
            }
        });

        join_all(executions).await
    }

    fn finish(&self, answer: String, stop: StopCause) -> ConversationOutcome {
        let rounds = self.state.round();
        info!(rounds, stop = ?stop, "Conversation finished");
        self.logger.log(ConversationEvent::FinalAnswer {
            rounds,
            stop,
            answer: answer.clone(),
        });
        ConversationOutcome {
            answer,
            rounds,
            stop,
        }
    }

    fn finish_cancelled(&mut self) -> RunConversationError {
        info!(round = self.state.round(), "Conversation cancelled");
        self.state.mark_cancelled();
        if self.state.phase().can_advance_to(ConversationPhase::Done) {
            // Legal by the check above
            let _ = self.state.advance(ConversationPhase::Done);
        }
        self.logger.log(ConversationEvent::Cancelled {
            round: self.state.round(),
        });
        RunConversationError::Cancelled
    }
}

/// Reject responses that reuse a call id within one round.
fn check_call_ids(response: &LlmResponse) -> Result<(), GatewayError> {
    let mut seen = HashSet::new();
    for call in response.tool_calls() {
        if !seen.insert(call.id.clone()) {
            return Err(GatewayError::InvalidResponse(format!(
                "duplicate tool call id '{}'",
                call.id
            )));
        }
    }
    Ok(())
}
