//! # llmcalc core
//!
//! The pieces of one evaluation run, leaves first.
//!
//! ## Core Concepts
//! - **Transport**: the HTTP seam (`HttpTransport`), real or scripted
//! - **Credential**: bearer token fetched from the key-distribution endpoint
//! - **Provider**: chat-completion request construction and reply extraction
//! - **Normalize**: code-fence stripping and `{resultado, latex}` parsing
//! - **UI**: tone/phase/state model and the `View` the orchestrator drives

pub mod config;
pub mod credential;
pub mod error;
pub mod normalize;
pub mod provider;
pub mod transport;
pub mod ui;

pub use config::CalculatorConfig;
pub use credential::{Credential, CredentialFetcher};
pub use error::{Error, ErrorKind, Result};
pub use normalize::{normalize, strip_fence, EvaluationResult};
pub use provider::{ChatMessage, CompletionRequest, EvaluationClient, Role};
pub use transport::{HttpResponse, HttpTransport, RecordedRequest, ReqwestTransport, ScriptedTransport};
pub use ui::{Phase, Screen, Surface, Surfaces, Tone, Typesetter, UiState, View};
