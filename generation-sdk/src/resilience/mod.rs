//! Resilience patterns for generation clients
//!
//! Retry with exponential backoff and jitter for transient provider failures.

mod retry;

pub use retry::{RetryConfig, RetryExecutor};
