//! # HTTP Transport
//!
//! The two outbound calls of a pipeline run go through `HttpTransport`, so
//! the credential fetcher and the evaluation client can be exercised against
//! a scripted transport instead of the network.
//!
//! - `ReqwestTransport` is the real implementation
//! - `ScriptedTransport` replays canned responses and records every request

use crate::error::{self, Error, Result};
use reqwest::Client;
use std::collections::VecDeque;
use std::sync::Mutex;

/// A fully read HTTP response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    /// Status text, e.g. "Not Found"
    pub reason: String,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason_phrase(status),
            body: body.into(),
        }
    }

    /// 200 OK with the given body
    pub fn ok(body: impl Into<String>) -> Self {
        Self::new(200, body)
    }

    /// True for any 2xx status
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

fn reason_phrase(status: u16) -> String {
    reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}

/// Outbound HTTP used by the pipeline.
///
/// Transport failures (no response at all) are `NetworkFailed`; any
/// response, whatever its status, is returned as `Ok`.
#[allow(async_fn_in_trait)]
pub trait HttpTransport: Send + Sync {
    /// GET `url`
    async fn get(&self, url: &str) -> Result<HttpResponse>;

    /// POST `body` as JSON to `url` with a bearer token
    async fn post_json(&self, url: &str, bearer: &str, body: &serde_json::Value) -> Result<HttpResponse>;
}

impl<T: HttpTransport> HttpTransport for &T {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        (**self).get(url).await
    }

    async fn post_json(&self, url: &str, bearer: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        (**self).post_json(url, bearer, body).await
    }
}

// ============================================================================
// reqwest
// ============================================================================

/// `HttpTransport` backed by a reqwest client. No timeout is configured.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let client = Client::builder().build().map_err(|e| {
            Error::unexpected(format!("failed to create HTTP client: {}", e))
                .with_operation("transport::new")
                .set_source(e)
        })?;

        Ok(Self { client })
    }

    async fn read(url: &str, response: reqwest::Response) -> Result<HttpResponse> {
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| error::network_failed(url, e))?;

        Ok(HttpResponse {
            status,
            reason: reason_phrase(status),
            body,
        })
    }
}

impl HttpTransport for ReqwestTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        tracing::debug!(url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| error::network_failed(url, e))?;

        Self::read(url, response).await
    }

    async fn post_json(&self, url: &str, bearer: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        tracing::debug!(url, "POST");
        let response = self
            .client
            .post(url)
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", bearer))
            .json(body)
            .send()
            .await
            .map_err(|e| error::network_failed(url, e))?;

        Self::read(url, response).await
    }
}

// ============================================================================
// Scripted transport
// ============================================================================

/// A request seen by `ScriptedTransport`
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub bearer: Option<String>,
    pub body: Option<serde_json::Value>,
}

/// In-memory transport: replays queued responses in order, one queue per
/// method, and records every request. An exhausted queue yields a
/// `NetworkFailed` error.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    gets: Mutex<VecDeque<Result<HttpResponse>>>,
    posts: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for the next GET
    pub fn on_get(self, response: HttpResponse) -> Self {
        push(&self.gets, Ok(response));
        self
    }

    /// Queue a response for the next POST
    pub fn on_post(self, response: HttpResponse) -> Self {
        push(&self.posts, Ok(response));
        self
    }

    /// Queue a transport failure for the next POST
    pub fn fail_post(self, err: Error) -> Self {
        push(&self.posts, Err(err));
        self
    }

    /// Every request made so far, in order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Number of requests made with `method`
    pub fn count(&self, method: &str) -> usize {
        self.requests().iter().filter(|r| r.method == method).count()
    }

    fn record(&self, request: RecordedRequest) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
    }

    fn next(queue: &Mutex<VecDeque<Result<HttpResponse>>>, url: &str) -> Result<HttpResponse> {
        queue
            .lock()
            .ok()
            .and_then(|mut q| q.pop_front())
            .unwrap_or_else(|| Err(Error::network_failed(url, "no scripted response left")))
    }
}

fn push(queue: &Mutex<VecDeque<Result<HttpResponse>>>, item: Result<HttpResponse>) {
    if let Ok(mut q) = queue.lock() {
        q.push_back(item);
    }
}

impl HttpTransport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse> {
        self.record(RecordedRequest {
            method: "GET",
            url: url.to_string(),
            bearer: None,
            body: None,
        });
        Self::next(&self.gets, url)
    }

    async fn post_json(&self, url: &str, bearer: &str, body: &serde_json::Value) -> Result<HttpResponse> {
        self.record(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            bearer: Some(bearer.to_string()),
            body: Some(body.clone()),
        });
        Self::next(&self.posts, url)
    }
}
