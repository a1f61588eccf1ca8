use std::sync::Arc;

use async_trait::async_trait;
use generation_sdk::TextGenerator;

use super::{normalize_label, Sentiment, SentimentClassifier};
use crate::error::{ClassificationStage, Result, RouterError};
use crate::feedback::FeedbackText;
use crate::prompts;

/// Substrings that mark feedback as positive
pub const POSITIVE_KEYWORDS: &[&str] = &[
    "good",
    "great",
    "excellent",
    "amazing",
    "wonderful",
    "fantastic",
    "pleasant",
    "loved",
    "thank you",
];

/// Phrases that override a positive keyword match
pub const NEGATION_OVERRIDES: &[&str] = &[
    "not good",
    "not great",
    "no good",
    "wasn't good",
    "wasn't great",
];

/// Keyword-based sentiment, no external calls
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicSentimentClassifier;

impl HeuristicSentimentClassifier {
    pub fn classify(&self, text: &FeedbackText) -> Sentiment {
        let lowered = text.normalized();

        if NEGATION_OVERRIDES.iter().any(|phrase| lowered.contains(phrase)) {
            return Sentiment::Negative;
        }

        if POSITIVE_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        }
    }
}

#[async_trait]
impl SentimentClassifier for HeuristicSentimentClassifier {
    async fn classify_sentiment(&self, text: &FeedbackText) -> Result<Sentiment> {
        Ok(self.classify(text))
    }
}

/// Asks the generator for a one-word sentiment label
pub struct DelegatedSentimentClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl DelegatedSentimentClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl SentimentClassifier for DelegatedSentimentClassifier {
    async fn classify_sentiment(&self, text: &FeedbackText) -> Result<Sentiment> {
        let prompt = prompts::fill(prompts::SENTIMENT_PROMPT, text.as_str());
        let response = self.generator.generate(&prompt).await?;
        log::debug!("Sentiment classifier answered {:?}", response);
        parse_sentiment(&response)
    }
}

/// Read a sentiment label out of a generator reply.
///
/// Exactly one of "positive" and "negative" must appear as a word once case,
/// whitespace and punctuation are normalized away.
pub fn parse_sentiment(response: &str) -> Result<Sentiment> {
    let normalized = normalize_label(response);
    let positive = normalized.split(' ').any(|word| word == "positive");
    let negative = normalized.split(' ').any(|word| word == "negative");

    match (positive, negative) {
        (true, false) => Ok(Sentiment::Positive),
        (false, true) => Ok(Sentiment::Negative),
        _ => Err(RouterError::classification(
            ClassificationStage::Sentiment,
            response.trim(),
        )),
    }
}
