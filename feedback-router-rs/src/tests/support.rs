//! Test doubles for the text generator

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use generation_sdk::{Result, ServiceError, TextGenerator};

use crate::prompts;

type Script = Arc<dyn Fn() -> Result<String> + Send + Sync>;

/// Answers prompts by prefix and records every prompt it receives
#[derive(Clone, Default)]
pub struct ScriptedGenerator {
    scripts: Arc<Mutex<Vec<(String, Script)>>>,
    calls: Arc<Mutex<Vec<String>>>,
    delay: Option<Duration>,
}

impl ScriptedGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with `response` to prompts starting like `template`
    pub fn on(self, template: &str, response: &str) -> Self {
        let response = response.to_string();
        self.on_with(template, move || Ok(response.clone()))
    }

    pub fn on_with<F>(self, template: &str, script: F) -> Self
    where
        F: Fn() -> Result<String> + Send + Sync + 'static,
    {
        let prefix = fixed_part(template).to_string();
        let script: Script = Arc::new(script);
        self.scripts.lock().unwrap().push((prefix, script));
        self
    }

    /// Answer sentiment prompts
    pub fn sentiment(self, response: &str) -> Self {
        self.on(prompts::SENTIMENT_PROMPT, response)
    }

    /// Answer fault prompts
    pub fn fault(self, response: &str) -> Self {
        self.on(prompts::FAULT_PROMPT, response)
    }

    /// Answer every reply-rendering prompt with the same text
    pub fn replies(self, response: &str) -> Self {
        self.on(prompts::POSITIVE_INSTRUCTION, response)
            .on(prompts::NEGATIVE_AIRLINE_FAULT_INSTRUCTION, response)
            .on(prompts::NEGATIVE_NOT_AIRLINE_FAULT_INSTRUCTION, response)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Number of recorded prompts built from `template`
    pub fn calls_for(&self, template: &str) -> usize {
        let prefix = fixed_part(template);
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|prompt| prompt.starts_with(prefix))
            .count()
    }

    pub fn shared(&self) -> Arc<dyn TextGenerator> {
        Arc::new(self.clone())
    }
}

/// The part of a template before the feedback is substituted in
fn fixed_part(template: &str) -> &str {
    template
        .split(prompts::FEEDBACK_PLACEHOLDER)
        .next()
        .unwrap_or(template)
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.calls.lock().unwrap().push(prompt.to_string());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let script = self
            .scripts
            .lock()
            .unwrap()
            .iter()
            .find(|(prefix, _)| prompt.starts_with(prefix.as_str()))
            .map(|(_, script)| script.clone());

        match script {
            Some(script) => script(),
            None => Err(ServiceError::internal(format!(
                "no scripted response for prompt: {}",
                prompt.lines().next().unwrap_or_default()
            ))),
        }
    }
}
