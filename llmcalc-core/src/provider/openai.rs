//! OpenAI chat-completion wire types
//!
//! Works with OpenAI and other OpenAI-compatible APIs. Only the fields the
//! calculator sends or reads are modelled.

use super::*;
use serde::{Deserialize, Serialize};

// ============================================================================
// Request
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct OpenAIRequest {
    model: String,
    messages: Vec<OpenAIMessage>,
    #[serde(serialize_with = "serialize_temperature")]
    temperature: f32,
}

/// Whole temperatures go out as integers (`0`, not `0.0`)
fn serialize_temperature<S: serde::Serializer>(temperature: &f32, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    if temperature.fract() == 0.0 {
        serializer.serialize_i64(*temperature as i64)
    } else {
        serializer.serialize_f32(*temperature)
    }
}

#[derive(Debug, Serialize)]
struct OpenAIMessage {
    role: String,
    content: String,
}

impl From<&CompletionRequest> for OpenAIRequest {
    fn from(request: &CompletionRequest) -> Self {
        Self {
            model: request.model.clone(),
            messages: request.messages.iter().map(OpenAIMessage::from).collect(),
            temperature: request.temperature,
        }
    }
}

impl From<&ChatMessage> for OpenAIMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: match msg.role {
                Role::System => "system".into(),
                Role::User => "user".into(),
            },
            content: msg.content.clone(),
        }
    }
}

// ============================================================================
// Response
// ============================================================================

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    choices: Vec<OpenAIChoice>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIResponseMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIResponseMessage {
    content: Option<String>,
}

/// `choices[0].message.content` of a completion body.
///
/// A body that is not the standard envelope is `MalformedResponse`; a
/// missing, null or empty content is `EvaluationEmpty`.
pub(crate) fn extract_content(body: &str) -> Result<String> {
    let response: OpenAIResponse = serde_json::from_str(body)
        .map_err(|e| error::malformed_response(e.to_string()))?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| error::malformed_response("no choices in response"))?;

    match choice.message.content {
        Some(content) if !content.is_empty() => Ok(content),
        _ => Err(error::evaluation_empty()),
    }
}
