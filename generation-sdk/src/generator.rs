//! The text-generation seam
//!
//! Everything downstream of this crate sees the generation service as one
//! operation: send a prompt, get text back. Providers implement
//! [`TextGenerator`]; tests substitute scripted or mocked implementations.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, ServiceError};

/// A black-box text-generation capability
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate a completion for a single prompt. No streaming, no history.
    async fn generate(&self, prompt: &str) -> Result<String>;
}

#[async_trait]
impl<G: TextGenerator + ?Sized> TextGenerator for Arc<G> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt).await
    }
}

/// Bounds every call to the wrapped generator by a deadline.
///
/// An elapsed deadline surfaces as [`ServiceError::Timeout`]; the in-flight
/// call is dropped.
#[derive(Debug, Clone)]
pub struct WithTimeout<G> {
    inner: G,
    timeout: Duration,
}

impl<G> WithTimeout<G> {
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<G: TextGenerator> TextGenerator for WithTimeout<G> {
    async fn generate(&self, prompt: &str) -> Result<String> {
        match tokio::time::timeout(self.timeout, self.inner.generate(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(ServiceError::timeout(format!(
                "generation did not complete within {:?}",
                self.timeout
            ))),
        }
    }
}
