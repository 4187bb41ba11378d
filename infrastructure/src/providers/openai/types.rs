//! Chat-completions wire conversion.
//!
//! Pure functions between domain types and the OpenAI-compatible
//! `/chat/completions` JSON format. No I/O here, so everything is unit
//! tested without a server.

use relay_domain::{ContentBlock, LlmResponse, Message, Role, StopReason, Transcript};
use serde_json::{Value, json};
use thiserror::Error;

/// Errors from the OpenAI-compatible adapter
#[derive(Error, Debug)]
pub enum OpenAiError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(String),

    #[error("Missing API key: environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("API error: {0}")]
    Api(String),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// Encode tool-call arguments as the JSON string the wire format expects.
fn encode_arguments(arguments: &Value) -> String {
    match arguments {
        Value::String(raw) => raw.clone(),
        Value::Null => "{}".to_string(),
        other => other.to_string(),
    }
}

/// Convert one transcript message to its wire form
pub fn message_to_wire(message: &Message) -> Value {
    match message.role {
        Role::Tool => json!({
            "role": "tool",
            "tool_call_id": message.call_id.clone().unwrap_or_default(),
            "content": message.content.to_text(),
        }),
        Role::Assistant if message.has_tool_calls() => {
            let text = message.content.to_text();
            let tool_calls: Vec<Value> = message
                .tool_calls
                .iter()
                .map(|call| {
                    json!({
                        "id": call.id,
                        "type": "function",
                        "function": {
                            "name": call.tool_name,
                            "arguments": encode_arguments(&call.arguments),
                        }
                    })
                })
                .collect();
            json!({
                "role": "assistant",
                "content": if text.is_empty() { Value::Null } else { Value::String(text) },
                "tool_calls": tool_calls,
            })
        }
        role => json!({
            "role": role.as_str(),
            "content": message.content.to_text(),
        }),
    }
}

/// Convert the whole transcript, in order
pub fn transcript_to_wire(transcript: &Transcript) -> Vec<Value> {
    transcript.messages().iter().map(message_to_wire).collect()
}

/// Wrap advertised tool schemas (`{name, description, input_schema}`) as
/// chat-completions function tools
pub fn tools_to_wire(schemas: &[Value]) -> Vec<Value> {
    schemas
        .iter()
        .map(|schema| {
            json!({
                "type": "function",
                "function": {
                    "name": schema["name"],
                    "description": schema["description"],
                    "parameters": schema["input_schema"],
                }
            })
        })
        .collect()
}

/// Build the request body
pub fn build_payload(model: &str, transcript: &Transcript, tools: &[Value]) -> Value {
    let mut payload = json!({
        "model": model,
        "messages": transcript_to_wire(transcript),
    });
    if !tools.is_empty()
        && let Some(map) = payload.as_object_mut()
    {
        map.insert("tools".to_string(), Value::Array(tools_to_wire(tools)));
    }
    payload
}

/// Parse a chat-completions response body.
///
/// Tool-call arguments stay as the raw string the backend sent; argument
/// decoding and validation happen in the tool invoker.
pub fn response_from_wire(body: &Value) -> Result<LlmResponse, OpenAiError> {
    if let Some(error) = body.get("error") {
        let message = error
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| error.to_string());
        return Err(OpenAiError::Api(message));
    }

    let choice = body
        .get("choices")
        .and_then(|c| c.get(0))
        .ok_or_else(|| OpenAiError::MalformedResponse("no choices in response".to_string()))?;
    let message = choice
        .get("message")
        .ok_or_else(|| OpenAiError::MalformedResponse("choice has no message".to_string()))?;

    let mut content = Vec::new();
    if let Some(text) = message.get("content").and_then(Value::as_str)
        && !text.is_empty()
    {
        content.push(ContentBlock::text(text));
    }

    if let Some(calls) = message.get("tool_calls").and_then(Value::as_array) {
        for (index, call) in calls.iter().enumerate() {
            let id = call
                .get("id")
                .and_then(Value::as_str)
                .filter(|id| !id.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| format!("call_{index}"));
            let function = call.get("function").ok_or_else(|| {
                OpenAiError::MalformedResponse(format!("tool call {id} has no function"))
            })?;
            let name = function
                .get("name")
                .and_then(Value::as_str)
                .ok_or_else(|| {
                    OpenAiError::MalformedResponse(format!("tool call {id} has no name"))
                })?;
            let input = function.get("arguments").cloned().unwrap_or(Value::Null);

            content.push(ContentBlock::ToolUse {
                id,
                name: name.to_string(),
                input,
            });
        }
    }

    Ok(LlmResponse {
        content,
        stop_reason: choice
            .get("finish_reason")
            .and_then(Value::as_str)
            .map(StopReason::from_finish_reason),
        model: body.get("model").and_then(Value::as_str).map(str::to_string),
    })
}
