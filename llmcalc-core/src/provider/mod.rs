//! # Evaluation Client
//!
//! Sends the user's operation to an OpenAI-compatible chat-completion
//! endpoint and returns the assistant's raw reply text.
//!
//! ## Request shape
//! - POST `<base_url>/chat/completions`, JSON body, bearer authorization
//! - `model`, `temperature: 0` and exactly two messages: the fixed
//!   calculator instruction (system) and `Operation: <expr>` (user)
//!
//! The reply is returned untouched; cleaning it up is the normalizer's job.

pub mod openai;

use crate::config::CalculatorConfig;
use crate::credential::Credential;
use crate::error::{self, Error, Result};
use crate::transport::HttpTransport;
use serde::{Deserialize, Serialize};

/// Fixed instruction sent as the system message
pub const SYSTEM_PROMPT: &str = "\
You are a math calculator.
You must evaluate the user's operation precisely.

IMPORTANT rules:
- Reply ONLY with valid JSON.
- The JSON must have exactly these fields:
  {
    \"resultado\": number,
    \"latex\": string
  }
- \"resultado\" is the final numeric value of the operation.
- \"latex\" is a LaTeX expression showing the operation and its result.
- Do NOT use code blocks, do NOT use ```, do NOT write the word json.
- Reply with the JSON only, no additional text.";

/// Label prefixed to the operation in the user message
pub const OPERATION_LABEL: &str = "Operation: ";

// ============================================================================
// Core Types
// ============================================================================

/// A chat message in the request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

/// Request parameters for a completion
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature: 0.0,
        }
    }

    /// The calculator request for `expression`: system instruction, then
    /// the labelled operation, deterministic sampling.
    pub fn calculator(model: impl Into<String>, expression: &str) -> Self {
        Self::new(
            model,
            vec![
                ChatMessage::system(SYSTEM_PROMPT),
                ChatMessage::user(format!("{}{}", OPERATION_LABEL, expression)),
            ],
        )
    }
}

// ============================================================================
// Client
// ============================================================================

/// Chat-completion client for one model and endpoint
pub struct EvaluationClient<T> {
    transport: T,
    url: String,
    model: String,
}

impl<T: HttpTransport> EvaluationClient<T> {
    pub fn new(transport: T, config: &CalculatorConfig) -> Self {
        Self {
            transport,
            url: config.completion_url(),
            model: config.model.clone(),
        }
    }

    /// Ask the model to evaluate `expression`; returns the raw reply text
    pub async fn evaluate(&self, expression: &str, credential: &Credential) -> Result<String> {
        let request = CompletionRequest::calculator(&self.model, expression);
        let body = serde_json::to_value(openai::OpenAIRequest::from(&request))
            .map_err(|e| {
                Error::unexpected(format!("cannot encode completion request: {}", e))
                    .with_operation("provider::evaluate")
                    .set_source(e)
            })?;

        let response = self.transport.post_json(&self.url, credential.token(), &body).await?;

        if !response.is_success() {
            tracing::debug!(status = response.status, body = %response.body, "completion endpoint failed");
            return Err(error::evaluation_http(response.status, response.body));
        }

        tracing::debug!(body = %response.body, "completion response");
        let raw = openai::extract_content(&response.body)?;
        tracing::debug!(raw = %raw, "raw model text");
        Ok(raw)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::{HttpResponse, ScriptedTransport};

    fn completion(content: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "model": "gpt-4o-mini",
            "choices": [{ "index": 0, "message": { "role": "assistant", "content": content } }]
        })
        .to_string()
    }

    #[test]
    fn test_chat_message_constructors() {
        let sys = ChatMessage::system("rules");
        assert_eq!(sys.role, Role::System);

        let user = ChatMessage::user("Operation: 1+1");
        assert_eq!(user.role, Role::User);
        assert_eq!(user.content, "Operation: 1+1");
    }

    #[test]
    fn test_calculator_request() {
        let request = CompletionRequest::calculator("gpt-4o-mini", "2^10");

        assert_eq!(request.temperature, 0.0);
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(request.messages[1].content, "Operation: 2^10");
        assert!(SYSTEM_PROMPT.contains("\"resultado\": number"));
        assert!(SYSTEM_PROMPT.contains("\"latex\": string"));
    }

    #[tokio::test]
    async fn test_evaluate_request_shape() {
        let transport = ScriptedTransport::new().on_post(HttpResponse::ok(completion("{}")));
        let config = CalculatorConfig::new().with_base_url("http://llm.test/v1");
        let client = EvaluationClient::new(&transport, &config);

        client.evaluate("3*7", &Credential::new("sk-test")).await.unwrap();

        let requests = transport.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "http://llm.test/v1/chat/completions");
        assert_eq!(requests[0].bearer.as_deref(), Some("sk-test"));

        let body = requests[0].body.as_ref().unwrap();
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["temperature"].to_string(), "0");
        assert_eq!(body["messages"].as_array().map(Vec::len), Some(2));
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], SYSTEM_PROMPT);
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Operation: 3*7");
    }

    #[tokio::test]
    async fn test_evaluate_returns_raw_content() {
        let raw = "```json\n{\"resultado\":4,\"latex\":\"2+2=4\"}\n```";
        let transport = ScriptedTransport::new().on_post(HttpResponse::ok(completion(raw)));
        let client = EvaluationClient::new(&transport, &CalculatorConfig::default());

        let text = client.evaluate("2+2", &Credential::new("k")).await.unwrap();
        assert_eq!(text, raw);
    }

    #[tokio::test]
    async fn test_evaluate_http_error() {
        let transport = ScriptedTransport::new()
            .on_post(HttpResponse::new(401, r#"{"error":{"message":"Incorrect API key"}}"#));
        let client = EvaluationClient::new(&transport, &CalculatorConfig::default());

        let err = client.evaluate("1+1", &Credential::new("bad")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EvaluationHttp);
        assert_eq!(err.context_value("status"), Some("401"));
        assert!(err.context_value("body").unwrap().contains("Incorrect API key"));
        assert!(err.message().starts_with("HTTP error 401"));
    }

    #[tokio::test]
    async fn test_evaluate_empty_content() {
        let null_content = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        })
        .to_string();

        for body in [completion(""), null_content] {
            let transport = ScriptedTransport::new().on_post(HttpResponse::ok(body));
            let client = EvaluationClient::new(&transport, &CalculatorConfig::default());
            let err = client.evaluate("1+1", &Credential::new("k")).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::EvaluationEmpty);
        }
    }

    #[tokio::test]
    async fn test_evaluate_malformed_envelope() {
        for body in [r#"{"choices":[]}"#, r#"{"output":"4"}"#, "<html>", r#"{"choices":[{"text":"4"}]}"#] {
            let transport = ScriptedTransport::new().on_post(HttpResponse::ok(body));
            let client = EvaluationClient::new(&transport, &CalculatorConfig::default());
            let err = client.evaluate("1+1", &Credential::new("k")).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedResponse, "body: {}", body);
        }
    }
}
