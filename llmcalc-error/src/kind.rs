//! Error kinds for llmcalc operations

use std::fmt;

/// The kind of error that occurred.
///
/// One variant per failure the evaluation pipeline can surface. The
/// orchestrator reports every kind the same way (by message), so matching
/// on the kind is mostly useful to tests and to callers embedding the
/// library in another host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    // =========================================================================
    // General errors
    // =========================================================================
    /// An unexpected error occurred - catch-all for unhandled cases
    Unexpected,

    /// Invalid configuration (empty model, malformed endpoint URL)
    ConfigInvalid,

    /// The user submitted an empty operation
    InvalidInput,

    // =========================================================================
    // Credential errors
    // =========================================================================
    /// The key-distribution endpoint failed or returned no usable key
    CredentialFailed,

    // =========================================================================
    // Transport errors
    // =========================================================================
    /// The request never produced an HTTP response (DNS, connection refused)
    NetworkFailed,

    // =========================================================================
    // Evaluation errors
    // =========================================================================
    /// The completion endpoint answered with a non-2xx status
    EvaluationHttp,

    /// The completion succeeded but carried no message content
    EvaluationEmpty,

    /// The completion body is not the standard chat-completion envelope
    MalformedResponse,

    // =========================================================================
    // Normalization errors
    // =========================================================================
    /// The model reply is not parseable JSON
    ParseFailed,

    /// The model reply lacks `resultado` or has a non-string `latex`
    SchemaInvalid,
}

impl ErrorKind {
    /// Returns the error kind as a static string
    pub fn as_str(&self) -> &'static str {
        match self {
            // General
            ErrorKind::Unexpected => "Unexpected",
            ErrorKind::ConfigInvalid => "ConfigInvalid",
            ErrorKind::InvalidInput => "InvalidInput",

            // Credential
            ErrorKind::CredentialFailed => "CredentialFailed",

            // Transport
            ErrorKind::NetworkFailed => "NetworkFailed",

            // Evaluation
            ErrorKind::EvaluationHttp => "EvaluationHttp",
            ErrorKind::EvaluationEmpty => "EvaluationEmpty",
            ErrorKind::MalformedResponse => "MalformedResponse",

            // Normalization
            ErrorKind::ParseFailed => "ParseFailed",
            ErrorKind::SchemaInvalid => "SchemaInvalid",
        }
    }

    /// Whether this kind is raised before any request leaves the process
    pub fn is_local(&self) -> bool {
        matches!(self, ErrorKind::ConfigInvalid | ErrorKind::InvalidInput)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_display() {
        assert_eq!(ErrorKind::CredentialFailed.to_string(), "CredentialFailed");
        assert_eq!(ErrorKind::SchemaInvalid.to_string(), "SchemaInvalid");
    }

    #[test]
    fn test_is_local() {
        assert!(ErrorKind::InvalidInput.is_local());
        assert!(ErrorKind::ConfigInvalid.is_local());
        assert!(!ErrorKind::EvaluationHttp.is_local());
        assert!(!ErrorKind::NetworkFailed.is_local());
    }
}
