//! # llmcalc Agent
//!
//! The agent orchestrates one evaluation per user action:
//! 1. User submits an operation (empty input stops here)
//! 2. A fresh credential is fetched from the key-distribution endpoint
//! 3. The model evaluates the operation
//! 4. The reply is normalized into a value and a LaTeX string
//! 5. The view shows the result, or the error message of whichever step failed
//!
//! The calculator is the single error boundary; nothing is retried.

mod agent;

pub use agent::{Calculator, OperationRequest};
