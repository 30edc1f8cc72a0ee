//! Upstream HTTP layer: `EvaluationHttp` with an opt-in retry policy.

pub mod client;
pub mod retry;

pub use client::EvaluationHttp;
pub use retry::{RetryConfig, RetryPolicy};
