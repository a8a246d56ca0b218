//! Endpoint configuration

use crate::error::{self, Result};

/// Default key-distribution endpoint
pub const DEFAULT_CREDENTIAL_URL: &str = "https://690a3d811a446bb9cc21e93b.mockapi.io/apiKeyOpenAI";

/// Default OpenAI-compatible base URL
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Default completion model
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Where the two pipeline requests go and which model evaluates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculatorConfig {
    pub credential_url: String,
    pub base_url: String,
    pub model: String,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            credential_url: DEFAULT_CREDENTIAL_URL.into(),
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
        }
    }
}

impl CalculatorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_credential_url(mut self, url: impl Into<String>) -> Self {
        self.credential_url = url.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Full chat-completions URL
    pub fn completion_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }

    /// Reject empty values and URLs that are not http(s)
    pub fn validate(&self) -> Result<()> {
        check_url("credential_url", &self.credential_url)?;
        check_url("base_url", &self.base_url)?;
        if self.model.trim().is_empty() {
            return Err(error::config_invalid("model", "must not be empty"));
        }
        Ok(())
    }
}

fn check_url(field: &'static str, url: &str) -> Result<()> {
    if url.trim().is_empty() {
        return Err(error::config_invalid(field, "must not be empty"));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(error::config_invalid(field, format!("'{}' is not an http(s) URL", url)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_defaults() {
        let config = CalculatorConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert_eq!(config.completion_url(), "https://api.openai.com/v1/chat/completions");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_and_trailing_slash() {
        let config = CalculatorConfig::new()
            .with_base_url("http://localhost:8080/v1/")
            .with_credential_url("http://localhost:8080/keys")
            .with_model("local-model");

        assert_eq!(config.completion_url(), "http://localhost:8080/v1/chat/completions");
        assert_eq!(config.model, "local-model");
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let err = CalculatorConfig::new().with_model("  ").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
        assert_eq!(err.context_value("field"), Some("model"));

        let err = CalculatorConfig::new().with_base_url("ftp://x").validate().unwrap_err();
        assert_eq!(err.context_value("field"), Some("base_url"));

        let err = CalculatorConfig::new().with_credential_url("").validate().unwrap_err();
        assert_eq!(err.context_value("field"), Some("credential_url"));
    }
}
