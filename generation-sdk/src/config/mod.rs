//! Configuration management for generation clients
//!
//! This module provides utilities for loading and validating configuration
//! for generation clients, with support for environment variables.
//! Configuration is read into explicit structs once and passed around by
//! reference; nothing here writes to the process environment.

use std::collections::HashMap;
use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, ServiceError};

/// Base trait for configuration providers
pub trait ConfigProvider: Send + Sync {
    /// Get a string configuration value
    fn get_string(&self, key: &str) -> Result<String>;
}

/// Extension methods for configuration providers
pub trait ConfigProviderExt: ConfigProvider {
    /// Get a typed configuration value by parsing from string
    fn get<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        <T as FromStr>::Err: fmt::Display,
    {
        let value = self.get_string(key)?;
        value.trim().parse::<T>().map_err(|e| {
            ServiceError::configuration(format!("Invalid value for key {}: {}", key, e))
        })
    }

    /// Get a typed value, falling back to `default` only when the key is absent.
    ///
    /// A present but malformed value is still an error.
    fn get_or<T>(&self, key: &str, default: T) -> Result<T>
    where
        T: FromStr,
        <T as FromStr>::Err: fmt::Display,
    {
        match self.get_string(key) {
            Ok(_) => self.get(key),
            Err(_) => Ok(default),
        }
    }

    /// Get a string configuration value with a default
    fn get_string_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|_| default.to_string())
    }
}

impl<T: ConfigProvider + ?Sized> ConfigProviderExt for T {}

/// Environment variable based configuration provider
#[derive(Debug, Clone, Default)]
pub struct EnvConfigProvider {
    /// Optional prefix for environment variables
    prefix: Option<String>,

    /// Optional namespace for variables (e.g., "OPENAI")
    namespace: Option<String>,
}

impl EnvConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a prefix for environment variables
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Set a namespace for environment variables
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Format a configuration key as an environment variable
    pub fn format_key(&self, key: &str) -> String {
        let mut env_key = String::new();

        if let Some(ref prefix) = self.prefix {
            env_key.push_str(prefix);
            env_key.push('_');
        }

        if let Some(ref namespace) = self.namespace {
            env_key.push_str(namespace);
            env_key.push('_');
        }

        env_key.push_str(
            &key.to_uppercase()
                .replace(|c: char| !c.is_ascii_alphanumeric(), "_"),
        );

        env_key
    }
}

impl ConfigProvider for EnvConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        let env_key = self.format_key(key);

        env::var(&env_key).map_err(|e| match e {
            env::VarError::NotPresent => {
                ServiceError::configuration(format!("Environment variable not set: {}", env_key))
            }
            env::VarError::NotUnicode(_) => ServiceError::configuration(format!(
                "Environment variable is not valid unicode: {}",
                env_key
            )),
        })
    }
}

/// In-memory config provider for testing or static configuration
#[derive(Debug, Clone, Default)]
pub struct MemoryConfigProvider {
    values: HashMap<String, String>,
}

impl MemoryConfigProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a configuration value
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: ToString,
    {
        self.values.insert(key.into(), value.to_string());
    }
}

impl ConfigProvider for MemoryConfigProvider {
    fn get_string(&self, key: &str) -> Result<String> {
        self.values
            .get(key)
            .cloned()
            .ok_or_else(|| ServiceError::configuration(format!("Configuration key not found: {}", key)))
    }
}

/// Trait for service-specific configuration
pub trait ServiceConfig: fmt::Debug + Send + Sync {
    /// Validate this configuration
    fn validate(&self) -> Result<()>;

    /// Service name
    fn service_name(&self) -> &str;
}

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo";

/// Longest accepted per-request timeout
pub const MAX_OPENAI_TIMEOUT_SECONDS: u64 = 600;

/// Most retries accepted for one call
pub const MAX_OPENAI_RETRIES: u32 = 10;

/// Configuration for an OpenAI-compatible chat-completions endpoint
#[derive(Clone)]
pub struct OpenAIConfig {
    /// API key
    pub api_key: String,

    /// Organization ID (optional)
    pub org_id: Option<String>,

    /// Base URL (can be changed for proxies or compatible providers)
    pub base_url: String,

    /// Model identifier
    pub model: String,

    /// Sampling temperature
    pub temperature: f32,

    /// Timeout in seconds for a single request
    pub timeout_seconds: u64,

    /// Retries for transient failures (0 disables retrying)
    pub max_retries: u32,
}

impl fmt::Debug for OpenAIConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAIConfig")
            .field("api_key", &"[REDACTED]")
            .field("org_id", &self.org_id)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("temperature", &self.temperature)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("max_retries", &self.max_retries)
            .finish()
    }
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            org_id: None,
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            model: DEFAULT_OPENAI_MODEL.to_string(),
            temperature: 0.7,
            timeout_seconds: 30,
            max_retries: 2,
        }
    }
}

impl OpenAIConfig {
    /// Load configuration from a config provider.
    ///
    /// `openai_api_key` is required; everything else has a default.
    pub fn from_provider<P: ConfigProvider + ?Sized>(provider: &P) -> Result<Self> {
        let defaults = Self::default();

        let api_key = provider.get_string("openai_api_key")?;
        let org_id = provider.get_string("openai_org_id").ok();
        let base_url = provider.get_string_or("openai_base_url", &defaults.base_url);
        let model = provider.get_string_or("openai_model", &defaults.model);
        let temperature = provider.get_or("openai_temperature", defaults.temperature)?;
        let timeout_seconds = provider.get_or("openai_timeout_seconds", defaults.timeout_seconds)?;
        let max_retries = provider.get_or("openai_max_retries", defaults.max_retries)?;

        let config = Self {
            api_key,
            org_id,
            base_url,
            model,
            temperature,
            timeout_seconds,
            max_retries,
        };

        config.validate()?;
        Ok(config)
    }
}

impl ServiceConfig for OpenAIConfig {
    fn validate(&self) -> Result<()> {
        if self.api_key.trim().is_empty() {
            return Err(ServiceError::configuration("OpenAI API key is required"));
        }

        if self.base_url.is_empty() {
            return Err(ServiceError::configuration("OpenAI base URL is required"));
        }

        if self.model.is_empty() {
            return Err(ServiceError::configuration("OpenAI model is required"));
        }

        if self.timeout_seconds == 0 {
            return Err(ServiceError::configuration("OpenAI timeout must be at least one second"));
        }

        if self.timeout_seconds > MAX_OPENAI_TIMEOUT_SECONDS {
            return Err(ServiceError::configuration(format!(
                "OpenAI timeout must be at most {} seconds, got {}",
                MAX_OPENAI_TIMEOUT_SECONDS, self.timeout_seconds
            )));
        }

        if self.max_retries > MAX_OPENAI_RETRIES {
            return Err(ServiceError::configuration(format!(
                "OpenAI retries must be at most {}, got {}",
                MAX_OPENAI_RETRIES, self.max_retries
            )));
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ServiceError::configuration(format!(
                "OpenAI temperature must be within 0.0..=2.0, got {}",
                self.temperature
            )));
        }

        Ok(())
    }

    fn service_name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("key1", "value1");
        provider.set("key2", "123");

        assert_eq!(provider.get_string("key1").unwrap(), "value1");
        assert_eq!(provider.get::<i64>("key2").unwrap(), 123);
        assert!(provider.get_string("key3").is_err());
    }

    #[test]
    fn test_get_or_rejects_malformed_values() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("retries", "lots");

        assert_eq!(provider.get_or("missing", 7u32).unwrap(), 7);
        assert!(provider.get_or("retries", 7u32).is_err());
    }

    #[test]
    fn test_env_config_provider_key_format() {
        let provider = EnvConfigProvider::new()
            .with_prefix("TEST")
            .with_namespace("CONFIG");

        assert_eq!(provider.format_key("api_key"), "TEST_CONFIG_API_KEY");
        assert_eq!(provider.format_key("base-url"), "TEST_CONFIG_BASE_URL");
    }

    #[test]
    fn test_openai_config_defaults() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("openai_api_key", "test_api_key");
        provider.set("openai_base_url", "https://test.openai.com");

        let config = OpenAIConfig::from_provider(&provider).unwrap();
        assert_eq!(config.api_key, "test_api_key");
        assert_eq!(config.base_url, "https://test.openai.com");
        assert_eq!(config.model, DEFAULT_OPENAI_MODEL);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_retries, 2);
    }

    #[test]
    fn test_openai_config_requires_key() {
        let provider = MemoryConfigProvider::new();
        let err = OpenAIConfig::from_provider(&provider).unwrap_err();
        assert!(matches!(err, ServiceError::Configuration(_)));

        let config = OpenAIConfig {
            api_key: "   ".to_string(),
            ..OpenAIConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_openai_config_bounds() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("openai_api_key", "test_api_key");
        provider.set("openai_timeout_seconds", u64::MAX);
        let err = OpenAIConfig::from_provider(&provider).unwrap_err();
        assert!(err.to_string().contains("at most 600 seconds"));

        let config = OpenAIConfig {
            api_key: "test_api_key".to_string(),
            max_retries: MAX_OPENAI_RETRIES + 1,
            ..OpenAIConfig::default()
        };
        assert!(config.validate().is_err());

        let config = OpenAIConfig {
            api_key: "test_api_key".to_string(),
            timeout_seconds: MAX_OPENAI_TIMEOUT_SECONDS,
            max_retries: MAX_OPENAI_RETRIES,
            ..OpenAIConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = OpenAIConfig {
            api_key: "sk-very-secret".to_string(),
            ..OpenAIConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("very-secret"));
    }
}
