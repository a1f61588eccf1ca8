//! Application configuration
//!
//! Read once at start from a [`ConfigProvider`] (the environment with the
//! `FEEDBACK` prefix in production) into an [`AppConfig`] that is passed by
//! reference from then on.

use std::net::SocketAddr;
use std::time::Duration;

use generation_sdk::config::{ConfigProvider, ConfigProviderExt, OpenAIConfig};
use generation_sdk::RetryConfig;

use crate::classify::ClassifierMode;
use crate::error::{Result, RouterError};
use crate::feedback::DEFAULT_MAX_FEEDBACK_CHARS;
use crate::selector::RenderMode;

pub const ENV_PREFIX: &str = "FEEDBACK";
pub const DEFAULT_SERVICE_ADDR: &str = "0.0.0.0:8501";

/// Largest accepted feedback length limit
pub const MAX_FEEDBACK_CHARS_LIMIT: usize = 100_000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub openai: OpenAIConfig,
    pub sentiment_mode: ClassifierMode,
    pub fault_mode: ClassifierMode,
    pub render_mode: RenderMode,
    pub max_feedback_chars: usize,
    pub bind_addr: SocketAddr,
}

impl AppConfig {
    /// Load and validate everything the service needs.
    ///
    /// A missing or blank credential and any malformed setting fail here,
    /// before the service starts listening.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let openai = OpenAIConfig::from_provider(provider).map_err(|e| {
            RouterError::configuration(format!("generation client: {}", e.root()))
        })?;

        let sentiment_mode = provider
            .get_string_or("sentiment_mode", "heuristic")
            .parse::<ClassifierMode>()?;
        let fault_mode = provider
            .get_string_or("fault_mode", "heuristic")
            .parse::<ClassifierMode>()?;
        let render_mode = provider
            .get_string_or("render_mode", "generate")
            .parse::<RenderMode>()?;

        let max_feedback_chars = provider
            .get_or("max_feedback_chars", DEFAULT_MAX_FEEDBACK_CHARS)
            .map_err(|e| RouterError::configuration(e.root().to_string()))?;
        if max_feedback_chars == 0 || max_feedback_chars > MAX_FEEDBACK_CHARS_LIMIT {
            return Err(RouterError::configuration(format!(
                "max_feedback_chars must be within 1..={}, got {}",
                MAX_FEEDBACK_CHARS_LIMIT, max_feedback_chars
            )));
        }

        let bind_addr = provider
            .get_string_or("service_addr", DEFAULT_SERVICE_ADDR)
            .parse::<SocketAddr>()
            .map_err(|e| RouterError::configuration(format!("invalid service_addr: {}", e)))?;

        Ok(Self {
            openai,
            sentiment_mode,
            fault_mode,
            render_mode,
            max_feedback_chars,
            bind_addr,
        })
    }

    /// Upper bound for one generator call including its retries.
    ///
    /// Each attempt is bounded by the HTTP timeout; the slack covers the
    /// backoff sleeps between attempts.
    pub fn generation_deadline(&self) -> Duration {
        let retries = self.openai.max_retries;
        let per_attempt = Duration::from_secs(self.openai.timeout_seconds);

        per_attempt
            .saturating_mul(retries.saturating_add(1))
            .saturating_add(longest_backoff().saturating_mul(retries))
    }
}

/// Longest sleep the client's retry policy can take between two attempts,
/// jitter included
fn longest_backoff() -> Duration {
    let policy = RetryConfig::default();
    policy
        .max_interval
        .mul_f64(1.0 + policy.randomization_factor)
}
