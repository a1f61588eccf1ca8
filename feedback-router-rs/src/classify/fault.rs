use std::sync::Arc;

use async_trait::async_trait;
use generation_sdk::TextGenerator;

use super::{normalize_label, FaultAttribution, FaultClassifier};
use crate::error::{ClassificationStage, Result, RouterError};
use crate::feedback::FeedbackText;
use crate::prompts;

/// Substrings that put the blame on the airline
pub const AIRLINE_FAULT_KEYWORDS: &[&str] = &[
    "lost luggage",
    "lost my luggage",
    "lost our luggage",
    "lost my bag",
    "luggage was lost",
    "delay by airline",
    "delayed by the airline",
    "overbooked",
    "cancelled by the airline",
];

#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicFaultClassifier;

impl HeuristicFaultClassifier {
    pub fn classify(&self, text: &FeedbackText) -> FaultAttribution {
        let lowered = text.normalized();
        if AIRLINE_FAULT_KEYWORDS.iter().any(|keyword| lowered.contains(keyword)) {
            FaultAttribution::AirlineFault
        } else {
            FaultAttribution::NotAirlineFault
        }
    }
}

#[async_trait]
impl FaultClassifier for HeuristicFaultClassifier {
    async fn classify_fault(&self, text: &FeedbackText) -> Result<FaultAttribution> {
        Ok(self.classify(text))
    }
}

/// Asks the generator whether the airline is to blame
pub struct DelegatedFaultClassifier {
    generator: Arc<dyn TextGenerator>,
}

impl DelegatedFaultClassifier {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl FaultClassifier for DelegatedFaultClassifier {
    async fn classify_fault(&self, text: &FeedbackText) -> Result<FaultAttribution> {
        let prompt = prompts::fill(prompts::FAULT_PROMPT, text.as_str());
        let response = self.generator.generate(&prompt).await?;
        log::debug!("Fault classifier answered {:?}", response);
        parse_fault(&response)
    }
}

/// Words that flip an "airline fault" label when they come shortly before it
const FAULT_NEGATIONS: &[&str] = &["not", "no", "never", "isn't", "wasn't", "neither", "nor"];

/// How many words before "airline fault" may hold the negation ("not an airline fault")
const NEGATION_WINDOW: usize = 3;

/// Read a fault label out of a generator reply.
///
/// The reply must mention "airline fault"; a negation within a few words
/// before it makes the label "not airline fault".
pub fn parse_fault(response: &str) -> Result<FaultAttribution> {
    let normalized = normalize_label(response);
    let words: Vec<&str> = normalized.split(' ').collect();

    let label_at = words
        .windows(2)
        .position(|pair| pair[0] == "airline" && pair[1] == "fault");

    match label_at {
        Some(index) => {
            let negated = words[index.saturating_sub(NEGATION_WINDOW)..index]
                .iter()
                .any(|word| FAULT_NEGATIONS.contains(word));
            if negated {
                Ok(FaultAttribution::NotAirlineFault)
            } else {
                Ok(FaultAttribution::AirlineFault)
            }
        }
        None => Err(RouterError::classification(
            ClassificationStage::Fault,
            response.trim(),
        )),
    }
}
