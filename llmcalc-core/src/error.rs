//! llmcalc-core error types
//!
//! Re-exports llmcalc-error and provides pipeline-specific conveniences.

pub use llmcalc_error::{Error, ErrorKind, Result};

// =============================================================================
// Pipeline error constructors
// =============================================================================

/// Create a CredentialFailed error for a non-2xx credential response
pub fn credential_status(status: u16, reason: impl Into<String>) -> Error {
    Error::credential_status(status, reason).with_operation("credential::fetch")
}

/// Create a CredentialFailed error for a body without a usable key
pub fn credential_missing() -> Error {
    Error::credential_missing().with_operation("credential::fetch")
}

/// Create a NetworkFailed error from a transport failure
pub fn network_failed(url: impl Into<String>, err: reqwest::Error) -> Error {
    Error::network_failed(url, err.to_string())
        .with_operation("transport::send")
        .set_source(err)
}

/// Create an EvaluationHttp error
pub fn evaluation_http(status: u16, body: impl Into<String>) -> Error {
    Error::evaluation_http(status, body).with_operation("provider::evaluate")
}

/// Create an EvaluationEmpty error
pub fn evaluation_empty() -> Error {
    Error::evaluation_empty().with_operation("provider::evaluate")
}

/// Create a MalformedResponse error
pub fn malformed_response(reason: impl Into<String>) -> Error {
    Error::malformed_response(reason).with_operation("provider::evaluate")
}

/// Create a ParseFailed error
pub fn parse_failed(raw: impl Into<String>, err: serde_json::Error) -> Error {
    Error::parse_failed(raw)
        .with_operation("normalize::parse")
        .set_source(err)
}

/// Create a SchemaInvalid error
pub fn schema_invalid() -> Error {
    Error::schema_invalid().with_operation("normalize::destructure")
}

/// Create a ConfigInvalid error
pub fn config_invalid(field: &'static str, reason: impl Into<String>) -> Error {
    Error::config_invalid(field, reason).with_operation("config::validate")
}
