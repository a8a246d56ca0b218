//! # Response Normalizer
//!
//! Turns the model's free-form reply into an `EvaluationResult`:
//! strip an optional code fence, parse JSON, destructure the two fields.
//!
//! Only a single outer fence is handled. Nested fences and fences in the
//! middle of the text are left alone and will usually fail to parse.

use crate::error::{self, Result};
use serde::Serialize;

const FENCE: &str = "```";

/// The evaluated operation as reported by the model.
///
/// `resultado` is whatever JSON value the model put there; only its
/// presence is checked, not that it is a number.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationResult {
    pub resultado: serde_json::Value,
    pub latex: String,
}

impl EvaluationResult {
    pub fn new(resultado: impl Into<serde_json::Value>, latex: impl Into<String>) -> Self {
        Self {
            resultado: resultado.into(),
            latex: latex.into(),
        }
    }

    /// `resultado` as plain text: strings unquoted, anything else as JSON
    pub fn resultado_text(&self) -> String {
        match &self.resultado {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

/// Remove a wrapping ```` ``` ```` fence (with or without a language tag).
///
/// Text that does not start with a fence is only trimmed.
pub fn strip_fence(raw: &str) -> String {
    let mut text = raw.trim();

    if text.starts_with(FENCE) {
        if let Some(newline) = text.find('\n') {
            text = &text[newline + 1..];
        }
        if let Some(inner) = text.strip_suffix(FENCE) {
            text = inner;
        }
        text = text.trim();
    }

    text.to_string()
}

/// Parse the model reply into an `EvaluationResult`
pub fn normalize(raw: &str) -> Result<EvaluationResult> {
    let text = strip_fence(raw);

    let parsed: serde_json::Value = match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(e) => {
            tracing::debug!(raw = %text, "model reply is not parseable JSON");
            return Err(error::parse_failed(text, e));
        }
    };

    let resultado = parsed.get("resultado").cloned();
    let latex = parsed.get("latex").and_then(|v| v.as_str());

    match (resultado, latex) {
        (Some(resultado), Some(latex)) => Ok(EvaluationResult {
            resultado,
            latex: latex.to_string(),
        }),
        _ => {
            tracing::debug!(parsed = %parsed, "model reply misses 'resultado' or 'latex'");
            Err(error::schema_invalid())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_strip_fence_passthrough() {
        assert_eq!(strip_fence("  {\"a\":1}\n"), "{\"a\":1}");
        assert_eq!(strip_fence(""), "");
    }

    #[test]
    fn test_strip_fence_with_language_tag() {
        assert_eq!(strip_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_without_language_tag() {
        assert_eq!(strip_fence("```\n{\"a\":1}\n```\n\n"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_missing_closing_fence() {
        assert_eq!(strip_fence("```json\n{\"a\":1}"), "{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_single_line() {
        // no newline: only the trailing fence goes
        assert_eq!(strip_fence("```{\"a\":1}```"), "```{\"a\":1}");
    }

    #[test]
    fn test_strip_fence_leaves_mid_string_fences() {
        let text = "result: ```{\"a\":1}```";
        assert_eq!(strip_fence(text), text);
    }

    #[test]
    fn test_normalize_fenced_and_plain_agree() {
        let fenced = normalize("```json\n{\"resultado\":4,\"latex\":\"2+2=4\"}\n```").unwrap();
        let plain = normalize("{\"resultado\":4,\"latex\":\"2+2=4\"}").unwrap();

        assert_eq!(fenced, EvaluationResult::new(4, "2+2=4"));
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_normalize_missing_latex() {
        let err = normalize("{\"resultado\":4}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaInvalid);
    }

    #[test]
    fn test_normalize_non_string_latex() {
        let err = normalize("{\"resultado\":4,\"latex\":42}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaInvalid);
    }

    #[test]
    fn test_normalize_missing_resultado() {
        let err = normalize("{\"latex\":\"x\"}").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaInvalid);

        let err = normalize("[1, 2]").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SchemaInvalid);
    }

    #[test]
    fn test_normalize_not_json() {
        let err = normalize("not json").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailed);
        assert_eq!(err.context_value("raw"), Some("not json"));
    }

    #[test]
    fn test_normalize_keeps_raw_reply_out_of_message() {
        let raw = "Sure! The answer is 4, because 2+2=4.";
        let err = normalize(raw).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::ParseFailed);
        assert!(!err.message().contains("The answer is 4"));
        assert!(err.message().contains("log"));
        assert_eq!(err.context_value("raw"), Some(raw));
    }

    #[test]
    fn test_normalize_accepts_non_numeric_resultado() {
        let result = normalize("{\"resultado\":\"indefinido\",\"latex\":\"1/0\"}").unwrap();
        assert_eq!(result.resultado, json!("indefinido"));

        let result = normalize("{\"resultado\":null,\"latex\":\"x\"}").unwrap();
        assert_eq!(result.resultado, serde_json::Value::Null);
    }

    #[test]
    fn test_resultado_text() {
        assert_eq!(EvaluationResult::new(21, "").resultado_text(), "21");
        assert_eq!(EvaluationResult::new(0.5, "").resultado_text(), "0.5");
        assert_eq!(EvaluationResult::new("x", "").resultado_text(), "x");
        assert_eq!(EvaluationResult::new(json!([1, 2]), "").resultado_text(), "[1,2]");
    }
}
