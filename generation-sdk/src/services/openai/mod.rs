//! OpenAI API client implementation
//!
//! A strongly-typed client for OpenAI-compatible chat-completions endpoints.
//! [`OpenAIClient`] implements [`TextGenerator`] by sending the prompt as a
//! single user message and returning the first choice's content.

mod models;
pub use models::*;

use std::time::{Duration, Instant};

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::Client;

use crate::config::{OpenAIConfig, ServiceConfig};
use crate::error::{ErrorContext, Result, ServiceError};
use crate::generator::TextGenerator;
use crate::resilience::{RetryConfig, RetryExecutor};
use crate::services::common::{build_http_client, parse_error_response, UserAgent};
use crate::util::{generate_request_id, sanitize_for_logging, truncate_string};

const CHAT_COMPLETIONS_ENDPOINT: &str = "chat/completions";

/// OpenAI API client
pub struct OpenAIClient {
    /// HTTP client, carries the per-request timeout
    http_client: Client,

    config: OpenAIConfig,

    retry: RetryExecutor,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("config", &self.config)
            .field("retry", self.retry.config())
            .finish()
    }
}

impl OpenAIClient {
    /// Create a new OpenAI client from a validated configuration
    pub fn new_with_config(config: OpenAIConfig) -> Result<Self> {
        config.validate()?;

        let http_client = build_http_client(
            Some(UserAgent {
                extra: Some("openai-client".to_string()),
                ..UserAgent::default()
            }),
            Some(Duration::from_secs(config.timeout_seconds)),
        )?;

        // Attempts are bounded by count; each one already carries the HTTP timeout
        let retry = RetryExecutor::new(RetryConfig {
            max_retries: config.max_retries,
            max_elapsed_time: None,
            ..RetryConfig::default()
        });

        Ok(Self {
            http_client,
            config,
            retry,
        })
    }

    /// Create a new builder for the OpenAI client
    pub fn builder() -> OpenAIClientBuilder {
        OpenAIClientBuilder::default()
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// Send a chat completion request, retrying transient failures
    pub async fn chat_completion(&self, request: ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        self.retry
            .execute(|| self.send_chat_completion(&request))
            .await
    }

    /// Create a chat completion from a single user message
    pub async fn simple_completion(&self, message: &str) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![ChatMessage::user(message)],
            temperature: Some(self.config.temperature),
            ..Default::default()
        };

        let response = self.chat_completion(request).await?;
        match response.first_content() {
            Some(content) => Ok(content.to_string()),
            None if response.choices.is_empty() => {
                Err(ServiceError::parsing("No completion choices returned"))
            }
            None => Err(ServiceError::parsing("Empty completion response")),
        }
    }

    async fn send_chat_completion(&self, request: &ChatCompletionRequest) -> Result<ChatCompletionResponse> {
        let url = format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            CHAT_COMPLETIONS_ENDPOINT
        );
        let request_id = generate_request_id();
        debug!(
            "Sending request to OpenAI: POST {} (request_id={}, model={}, prompt={:?})",
            url,
            request_id,
            request.model,
            request
                .messages
                .last()
                .map(|m| truncate_string(&m.content, 80))
                .unwrap_or_default()
        );

        let start_time = Instant::now();

        let mut builder = self
            .http_client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .header("X-Request-Id", &request_id)
            .json(request);

        if let Some(ref org) = self.config.org_id {
            builder = builder.header("OpenAI-Organization", org);
        }

        let response = builder.send().await.map_err(|e| {
            ServiceError::from(e).with_context(
                ErrorContext::for_service("openai")
                    .endpoint(CHAT_COMPLETIONS_ENDPOINT)
                    .request_id(&request_id),
            )
        })?;

        let status = response.status();
        if !status.is_success() {
            let error = parse_error_response("openai", CHAT_COMPLETIONS_ENDPOINT, &request_id, response).await;
            warn!(
                "OpenAI request {} failed with status {}: {}",
                request_id,
                status.as_u16(),
                sanitize_for_logging(&error.to_string())
            );
            return Err(error);
        }

        let parsed = response
            .json::<ChatCompletionResponse>()
            .await
            .map_err(|e| ServiceError::parsing(format!("Failed to parse response: {}", e)))?;

        debug!(
            "OpenAI request {} completed in {:.2}ms",
            request_id,
            start_time.elapsed().as_secs_f64() * 1000.0
        );

        Ok(parsed)
    }
}

#[async_trait]
impl TextGenerator for OpenAIClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.simple_completion(prompt).await
    }
}

/// Builder for OpenAI client
#[derive(Debug, Default)]
pub struct OpenAIClientBuilder {
    config: Option<OpenAIConfig>,
    api_key: Option<String>,
    org_id: Option<String>,
    base_url: Option<String>,
    model: Option<String>,
    temperature: Option<f32>,
    timeout_seconds: Option<u64>,
    retry_config: Option<RetryConfig>,
}

impl OpenAIClientBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration; explicit setters still override it
    pub fn config(mut self, config: OpenAIConfig) -> Self {
        self.config = Some(config);
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn org_id(mut self, org_id: impl Into<String>) -> Self {
        self.org_id = Some(org_id.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the timeout in seconds
    pub fn timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = Some(seconds);
        self
    }

    /// Replace the retry policy derived from the configuration
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry_config = Some(config);
        self
    }

    /// Build the OpenAI client
    pub fn build(self) -> Result<OpenAIClient> {
        let mut config = self.config.unwrap_or_default();

        if let Some(api_key) = self.api_key {
            config.api_key = api_key;
        }
        if let Some(org_id) = self.org_id {
            config.org_id = Some(org_id);
        }
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        if let Some(model) = self.model {
            config.model = model;
        }
        if let Some(temperature) = self.temperature {
            config.temperature = temperature;
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = timeout;
        }

        let mut client = OpenAIClient::new_with_config(config)?;

        if let Some(retry_config) = self.retry_config {
            client.retry = RetryExecutor::new(retry_config);
        }

        Ok(client)
    }
}
