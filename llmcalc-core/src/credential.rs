//! # Credential Fetcher
//!
//! Retrieves the bearer token from the key-distribution endpoint. The
//! endpoint answers with a JSON array; the token is `body[0].apiKey`.
//! Nothing is cached: every pipeline run fetches a fresh credential.

use crate::error::{self, Result};
use crate::transport::HttpTransport;

/// A bearer token, alive for one pipeline run
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }

    pub fn token(&self) -> &str {
        &self.token
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential").field("token", &"<redacted>").finish()
    }
}

/// Fetches a `Credential` with one GET per call
pub struct CredentialFetcher<T> {
    transport: T,
    url: String,
}

impl<T: HttpTransport> CredentialFetcher<T> {
    pub fn new(transport: T, url: impl Into<String>) -> Self {
        Self {
            transport,
            url: url.into(),
        }
    }

    pub async fn fetch(&self) -> Result<Credential> {
        let response = self.transport.get(&self.url).await?;

        if !response.is_success() {
            tracing::debug!(status = response.status, reason = %response.reason, "credential endpoint failed");
            return Err(error::credential_status(response.status, response.reason));
        }

        let token = extract_api_key(&response.body).ok_or_else(error::credential_missing)?;
        tracing::debug!("credential obtained");
        Ok(Credential::new(token))
    }
}

/// `body[0].apiKey` as a non-empty string, if present
fn extract_api_key(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get(0)?
        .get("apiKey")?
        .as_str()
        .filter(|key| !key.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::transport::{HttpResponse, ScriptedTransport};

    const URL: &str = "http://keys.test/apiKey";

    #[test]
    fn test_extract_api_key() {
        assert_eq!(extract_api_key(r#"[{"apiKey":"sk-1"},{"apiKey":"sk-2"}]"#).as_deref(), Some("sk-1"));
        assert_eq!(extract_api_key("[]"), None);
        assert_eq!(extract_api_key(r#"[{"id":"1"}]"#), None);
        assert_eq!(extract_api_key(r#"[{"apiKey":""}]"#), None);
        assert_eq!(extract_api_key(r#"[{"apiKey":42}]"#), None);
        assert_eq!(extract_api_key(r#"{"apiKey":"sk-1"}"#), None);
        assert_eq!(extract_api_key("not json"), None);
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let transport = ScriptedTransport::new().on_get(HttpResponse::ok(r#"[{"apiKey":"sk-test","id":"1"}]"#));
        let fetcher = CredentialFetcher::new(&transport, URL);

        let credential = fetcher.fetch().await.unwrap();
        assert_eq!(credential.token(), "sk-test");
        assert_eq!(transport.requests()[0].url, URL);
    }

    #[tokio::test]
    async fn test_fetch_non_success_status() {
        let transport = ScriptedTransport::new().on_get(HttpResponse::new(404, "Not found"));
        let fetcher = CredentialFetcher::new(&transport, URL);

        let err = fetcher.fetch().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CredentialFailed);
        assert!(err.message().contains("Not Found"));
        assert_eq!(err.context_value("status"), Some("404"));
    }

    #[tokio::test]
    async fn test_fetch_missing_key() {
        for body in ["[]", r#"[{"key":"sk"}]"#, "null"] {
            let transport = ScriptedTransport::new().on_get(HttpResponse::ok(body));
            let err = CredentialFetcher::new(&transport, URL).fetch().await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::CredentialFailed, "body: {}", body);
            assert!(err.message().contains("not found"));
        }
    }

    #[tokio::test]
    async fn test_fetch_is_not_cached() {
        let transport = ScriptedTransport::new()
            .on_get(HttpResponse::ok(r#"[{"apiKey":"sk-a"}]"#))
            .on_get(HttpResponse::ok(r#"[{"apiKey":"sk-b"}]"#));
        let fetcher = CredentialFetcher::new(&transport, URL);

        assert_eq!(fetcher.fetch().await.unwrap().token(), "sk-a");
        assert_eq!(fetcher.fetch().await.unwrap().token(), "sk-b");
        assert_eq!(transport.count("GET"), 2);
    }

    #[test]
    fn test_debug_redacts_token() {
        let debug = format!("{:?}", Credential::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
    }
}
