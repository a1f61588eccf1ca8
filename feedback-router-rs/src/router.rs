//! The feedback routing pipeline
//!
//! One pass per submission: validate, classify sentiment, classify fault
//! (negative feedback only), then select and render a template. The router
//! holds only immutable parts and can be shared across concurrent requests.

use std::sync::Arc;

use generation_sdk::{TextGenerator, WithTimeout};

use crate::classify::{
    ClassifierMode, DelegatedFaultClassifier, DelegatedSentimentClassifier, FaultAttribution,
    FaultClassifier, HeuristicFaultClassifier, HeuristicSentimentClassifier, Sentiment,
    SentimentClassifier,
};
use crate::config::AppConfig;
use crate::error::Result;
use crate::feedback::{FeedbackText, DEFAULT_MAX_FEEDBACK_CHARS};
use crate::selector::{RenderMode, RenderedResponse, ResponseSelector};

pub struct FeedbackRouter {
    sentiment: Box<dyn SentimentClassifier>,
    fault: Box<dyn FaultClassifier>,
    selector: ResponseSelector,
    max_feedback_chars: usize,
}

impl FeedbackRouter {
    pub fn builder(generator: Arc<dyn TextGenerator>) -> FeedbackRouterBuilder {
        FeedbackRouterBuilder::new(generator)
    }

    /// Build the router described by the configuration.
    ///
    /// Every generator call is bounded by [`AppConfig::generation_deadline`].
    pub fn from_config<G>(config: &AppConfig, generator: G) -> Self
    where
        G: TextGenerator + 'static,
    {
        let bounded: Arc<dyn TextGenerator> =
            Arc::new(WithTimeout::new(generator, config.generation_deadline()));

        Self::builder(bounded)
            .sentiment_mode(config.sentiment_mode)
            .fault_mode(config.fault_mode)
            .render_mode(config.render_mode)
            .max_feedback_chars(config.max_feedback_chars)
            .build()
    }

    pub fn max_feedback_chars(&self) -> usize {
        self.max_feedback_chars
    }

    /// Route one raw submission to a rendered reply.
    ///
    /// Blank or over-long input is rejected before any classifier runs.
    pub async fn route(&self, raw: &str) -> Result<RenderedResponse> {
        let text = FeedbackText::parse(raw, self.max_feedback_chars)?;
        self.route_text(&text).await
    }

    /// Route feedback that has already been validated
    pub async fn route_text(&self, text: &FeedbackText) -> Result<RenderedResponse> {
        let sentiment = self.sentiment.classify_sentiment(text).await?;

        let fault = match sentiment {
            Sentiment::Negative => self.fault.classify_fault(text).await?,
            Sentiment::Positive => FaultAttribution::NotApplicable,
        };

        let response = self.selector.select_and_render(sentiment, fault, text).await?;

        log::info!(
            "Routed feedback ({} chars): sentiment={}, fault={}, template={}, generated={}",
            text.char_count(),
            response.sentiment,
            response.fault,
            response.template,
            response.generated
        );

        Ok(response)
    }
}

/// Assembles a [`FeedbackRouter`]; classifiers default to the heuristic ones
pub struct FeedbackRouterBuilder {
    generator: Arc<dyn TextGenerator>,
    sentiment_mode: ClassifierMode,
    fault_mode: ClassifierMode,
    render_mode: RenderMode,
    max_feedback_chars: usize,
    sentiment: Option<Box<dyn SentimentClassifier>>,
    fault: Option<Box<dyn FaultClassifier>>,
}

impl FeedbackRouterBuilder {
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator,
            sentiment_mode: ClassifierMode::default(),
            fault_mode: ClassifierMode::default(),
            render_mode: RenderMode::default(),
            max_feedback_chars: DEFAULT_MAX_FEEDBACK_CHARS,
            sentiment: None,
            fault: None,
        }
    }

    pub fn sentiment_mode(mut self, mode: ClassifierMode) -> Self {
        self.sentiment_mode = mode;
        self
    }

    pub fn fault_mode(mut self, mode: ClassifierMode) -> Self {
        self.fault_mode = mode;
        self
    }

    pub fn render_mode(mut self, mode: RenderMode) -> Self {
        self.render_mode = mode;
        self
    }

    pub fn max_feedback_chars(mut self, max_chars: usize) -> Self {
        self.max_feedback_chars = max_chars;
        self
    }

    /// Use a custom sentiment classifier instead of the mode's
    pub fn sentiment_classifier(mut self, classifier: Box<dyn SentimentClassifier>) -> Self {
        self.sentiment = Some(classifier);
        self
    }

    /// Use a custom fault classifier instead of the mode's
    pub fn fault_classifier(mut self, classifier: Box<dyn FaultClassifier>) -> Self {
        self.fault = Some(classifier);
        self
    }

    pub fn build(self) -> FeedbackRouter {
        let generator = self.generator;

        let sentiment: Box<dyn SentimentClassifier> = match (self.sentiment, self.sentiment_mode) {
            (Some(custom), _) => custom,
            (None, ClassifierMode::Heuristic) => Box::new(HeuristicSentimentClassifier),
            (None, ClassifierMode::Delegated) => {
                Box::new(DelegatedSentimentClassifier::new(generator.clone()))
            }
        };

        let fault: Box<dyn FaultClassifier> = match (self.fault, self.fault_mode) {
            (Some(custom), _) => custom,
            (None, ClassifierMode::Heuristic) => Box::new(HeuristicFaultClassifier),
            (None, ClassifierMode::Delegated) => {
                Box::new(DelegatedFaultClassifier::new(generator.clone()))
            }
        };

        log::debug!(
            "Feedback router ready: sentiment={}, fault={}, render={}",
            self.sentiment_mode,
            self.fault_mode,
            self.render_mode
        );

        FeedbackRouter {
            sentiment,
            fault,
            selector: ResponseSelector::new(generator, self.render_mode),
            max_feedback_chars: self.max_feedback_chars,
        }
    }
}
