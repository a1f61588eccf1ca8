//! # Generation SDK
//!
//! Client-side plumbing for talking to an external text-generation service.
//!
//! This crate provides:
//!
//! - `TextGenerator`: the single-operation seam (`prompt -> text`) that the
//!   rest of the system depends on, so any provider can sit behind it
//! - An OpenAI-compatible chat-completions client implementing it
//! - A normalized error type with HTTP error mapping
//! - Retry with exponential backoff and jitter for transient failures
//! - Configuration providers (environment, in-memory)

pub mod generator;
pub use generator::{TextGenerator, WithTimeout};

pub mod services;
pub use services::openai;

pub mod error;
pub use error::{ErrorContext, Result, ServiceError};

pub mod resilience;
pub use resilience::{RetryConfig, RetryExecutor};

pub mod config;
pub use config::{ConfigProvider, ConfigProviderExt, OpenAIConfig, ServiceConfig};

mod util;

#[cfg(test)]
mod tests;

