//! Sentiment and fault classification
//!
//! Each classifier comes in two flavours: a heuristic one that matches
//! keywords locally, and a delegated one that asks the text generator for a
//! one-label answer and parses it strictly.

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;

use crate::error::{Result, RouterError};
use crate::feedback::FeedbackText;

pub mod fault;
pub mod sentiment;

pub use fault::{DelegatedFaultClassifier, HeuristicFaultClassifier};
pub use sentiment::{DelegatedSentimentClassifier, HeuristicSentimentClassifier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    Positive,
    Negative,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cause of a negative experience.
///
/// `NotApplicable` is what the pipeline records for positive feedback, where
/// the fault classifier is never consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultAttribution {
    AirlineFault,
    NotAirlineFault,
    NotApplicable,
}

impl FaultAttribution {
    pub fn as_str(&self) -> &'static str {
        match self {
            FaultAttribution::AirlineFault => "airline fault",
            FaultAttribution::NotAirlineFault => "not airline fault",
            FaultAttribution::NotApplicable => "not applicable",
        }
    }
}

impl fmt::Display for FaultAttribution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps feedback to a sentiment label
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify_sentiment(&self, text: &FeedbackText) -> Result<Sentiment>;
}

/// Maps negative feedback to a fault attribution
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FaultClassifier: Send + Sync {
    async fn classify_fault(&self, text: &FeedbackText) -> Result<FaultAttribution>;
}

/// How a classifier reaches its answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClassifierMode {
    /// Keyword containment, no external calls
    #[default]
    Heuristic,
    /// One call to the text generator per classification
    Delegated,
}

impl FromStr for ClassifierMode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "heuristic" => Ok(ClassifierMode::Heuristic),
            "delegated" => Ok(ClassifierMode::Delegated),
            other => Err(RouterError::configuration(format!(
                "unknown classifier mode '{}', expected 'heuristic' or 'delegated'",
                other
            ))),
        }
    }
}

impl fmt::Display for ClassifierMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierMode::Heuristic => write!(f, "heuristic"),
            ClassifierMode::Delegated => write!(f, "delegated"),
        }
    }
}

/// Lowercase, turn punctuation into spaces and collapse whitespace, so a
/// generator reply like "  Not-Airline fault.\n" reads "not airline fault".
pub(crate) fn normalize_label(response: &str) -> String {
    response
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
