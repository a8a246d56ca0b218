//! # llmcalc-error
//!
//! Unified error handling for llmcalc, following OpenDAL's error handling practices.
//!
//! ## Design Philosophy
//!
//! - **ErrorKind**: Know what went wrong (e.g., CredentialFailed, SchemaInvalid)
//! - **Message**: The text shown to the end user at the error boundary
//! - **Error Context**: Status codes, raw bodies and unparsed text for the log
//! - **Error Source**: Wrap underlying errors without leaking raw types
//!
//! ## Usage
//!
//! ```rust
//! use llmcalc_error::{Error, ErrorKind};
//!
//! fn example() -> Result<(), Error> {
//!     Err(Error::new(ErrorKind::EvaluationHttp, "HTTP error 401: invalid key")
//!         .with_operation("provider::evaluate")
//!         .with_context("status", "401"))
//! }
//! ```
//!
//! ## Principles
//!
//! - All functions return `Result<T, llmcalc_error::Error>`
//! - External errors are wrapped with `set_source(err)`
//! - Same error handled once, subsequent ops only append context
//! - Don't abuse `From<OtherError>` to prevent raw error leakage

mod error;
mod kind;

pub use error::Error;
pub use kind::ErrorKind;

/// Result type alias using llmcalc Error
pub type Result<T> = std::result::Result<T, Error>;
