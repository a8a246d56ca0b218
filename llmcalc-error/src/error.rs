//! The main Error type for llmcalc

use crate::ErrorKind;
use std::fmt;

/// The unified error type for all llmcalc operations.
///
/// This error type provides:
/// - `kind`: What type of error occurred
/// - `message`: Human-readable description, shown to the end user
/// - `operation`: What operation caused the error
/// - `context`: Key-value pairs for debugging (status codes, raw bodies)
/// - `source`: The underlying error (if any)
///
/// # Example
///
/// ```rust
/// use llmcalc_error::{Error, ErrorKind};
///
/// let err = Error::new(ErrorKind::EvaluationHttp, "HTTP error 500: upstream down")
///     .with_operation("provider::evaluate")
///     .with_context("status", "500")
///     .with_context("body", "upstream down");
///
/// assert_eq!(err.kind(), ErrorKind::EvaluationHttp);
/// assert_eq!(err.context_value("status"), Some("500"));
/// ```
pub struct Error {
    kind: ErrorKind,
    message: String,
    operation: &'static str,
    context: Vec<(&'static str, String)>,
    source: Option<anyhow::Error>,
}

impl Error {
    /// Create a new error with the given kind and message
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            operation: "",
            context: Vec::new(),
            source: None,
        }
    }

    // =========================================================================
    // Getters
    // =========================================================================

    /// Get the error kind
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the operation that caused this error
    pub fn operation(&self) -> &'static str {
        self.operation
    }

    /// Get the context key-value pairs
    pub fn context(&self) -> &[(&'static str, String)] {
        &self.context
    }

    /// Look up the most recent context value recorded under `key`
    pub fn context_value(&self, key: &str) -> Option<&str> {
        self.context
            .iter()
            .rev()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Get the source error (if any)
    pub fn source_ref(&self) -> Option<&anyhow::Error> {
        self.source.as_ref()
    }

    // =========================================================================
    // Builders (chainable)
    // =========================================================================

    /// Set the operation that caused this error.
    ///
    /// If an operation was already set, the previous one is moved to context
    /// as "called" to preserve the call chain.
    pub fn with_operation(mut self, operation: &'static str) -> Self {
        if !self.operation.is_empty() {
            self.context.push(("called", self.operation.to_string()));
        }
        self.operation = operation;
        self
    }

    /// Add context to the error
    pub fn with_context(mut self, key: &'static str, value: impl Into<String>) -> Self {
        self.context.push((key, value.into()));
        self
    }

    /// Set the source error.
    ///
    /// # Panics (debug only)
    /// Panics in debug mode if source was already set.
    pub fn set_source(mut self, source: impl Into<anyhow::Error>) -> Self {
        debug_assert!(self.source.is_none(), "source error already set");
        self.source = Some(source.into());
        self
    }
}

// =============================================================================
// Display - compact, single-line format for logs
// =============================================================================

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.operation)?;

        if !self.context.is_empty() {
            write!(f, ", context {{ ")?;
            for (i, (key, value)) in self.context.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{}: {}", key, value)?;
            }
            write!(f, " }}")?;
        }

        if !self.message.is_empty() {
            write!(f, " => {}", self.message)?;
        }

        Ok(())
    }
}

// =============================================================================
// Debug - verbose, multi-line format for debugging
// =============================================================================

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} at {}", self.kind, self.operation)?;

        if !self.message.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Message: {}", self.message)?;
        }

        if !self.context.is_empty() {
            writeln!(f)?;
            writeln!(f, "    Context:")?;
            for (key, value) in &self.context {
                writeln!(f, "        {}: {}", key, value)?;
            }
        }

        if let Some(source) = &self.source {
            writeln!(f)?;
            writeln!(f, "    Source: {:?}", source)?;
        }

        Ok(())
    }
}

// =============================================================================
// std::error::Error implementation
// =============================================================================

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source.as_ref().map(|e| e.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// =============================================================================
// Convenience constructors
// =============================================================================

impl Error {
    /// Create an Unexpected error
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Unexpected, message)
    }

    /// Create a ConfigInvalid error
    pub fn config_invalid(field: &'static str, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(ErrorKind::ConfigInvalid, format!("invalid {}: {}", field, reason))
            .with_context("field", field)
    }

    /// Create an InvalidInput error for an empty operation
    pub fn empty_input() -> Self {
        Self::new(ErrorKind::InvalidInput, "enter an operation first")
    }

    /// Create a CredentialFailed error for a non-2xx credential response.
    ///
    /// The message carries the transport status text.
    pub fn credential_status(status: u16, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        Self::new(ErrorKind::CredentialFailed, format!("failed to fetch API key: {}", reason))
            .with_context("status", status.to_string())
    }

    /// Create a CredentialFailed error for a body without a usable key
    pub fn credential_missing() -> Self {
        Self::new(ErrorKind::CredentialFailed, "'apiKey' not found in the credential response")
    }

    /// Create a NetworkFailed error
    pub fn network_failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::NetworkFailed, reason).with_context("url", url)
    }

    /// Create an EvaluationHttp error carrying status and raw body
    pub fn evaluation_http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(ErrorKind::EvaluationHttp, format!("HTTP error {}: {}", status, body))
            .with_context("status", status.to_string())
            .with_context("body", body)
    }

    /// Create an EvaluationEmpty error
    pub fn evaluation_empty() -> Self {
        Self::new(ErrorKind::EvaluationEmpty, "no output text found in the response")
    }

    /// Create a MalformedResponse error
    pub fn malformed_response(reason: impl Into<String>) -> Self {
        Self::new(ErrorKind::MalformedResponse, format!("unexpected completion response: {}", reason.into()))
    }

    /// Create a ParseFailed error referencing the unparseable text
    pub fn parse_failed(raw: impl Into<String>) -> Self {
        Self::new(
            ErrorKind::ParseFailed,
            "the model did not return clean, parseable JSON; the raw reply is in the log",
        )
        .with_context("raw", raw.into())
    }

    /// Create a SchemaInvalid error
    pub fn schema_invalid() -> Self {
        Self::new(
            ErrorKind::SchemaInvalid,
            "the JSON does not contain the expected 'resultado' and 'latex' fields",
        )
    }
}
