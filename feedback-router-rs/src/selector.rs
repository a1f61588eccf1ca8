//! Template selection and rendering
//!
//! The (sentiment, fault) pair is matched against [`SELECTION_RULES`] in
//! order; the first rule that holds picks the template. The last rule always
//! holds, so every pair resolves to exactly one template.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use generation_sdk::TextGenerator;

use crate::classify::{FaultAttribution, Sentiment};
use crate::error::{Result, RouterError};
use crate::feedback::FeedbackText;
use crate::prompts;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    NegativeAirlineFault,
    NegativeNotAirlineFault,
    Positive,
    FallbackGeneral,
}

impl TemplateId {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemplateId::NegativeAirlineFault => "negative-airline-fault",
            TemplateId::NegativeNotAirlineFault => "negative-not-airline-fault",
            TemplateId::Positive => "positive",
            TemplateId::FallbackGeneral => "fallback-general",
        }
    }

    pub fn template(&self) -> &'static ResponseTemplate {
        match self {
            TemplateId::NegativeAirlineFault => &NEGATIVE_AIRLINE_FAULT,
            TemplateId::NegativeNotAirlineFault => &NEGATIVE_NOT_AIRLINE_FAULT,
            TemplateId::Positive => &POSITIVE,
            TemplateId::FallbackGeneral => &FALLBACK_GENERAL,
        }
    }
}

impl fmt::Display for TemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fixed response for one classification outcome.
///
/// `instruction` is sent to the generator; `reply`, filled with the
/// feedback, is shown when generation is skipped. A template without an
/// instruction is always shown verbatim.
#[derive(Debug)]
pub struct ResponseTemplate {
    pub id: TemplateId,
    pub instruction: Option<&'static str>,
    pub reply: &'static str,
}

pub static NEGATIVE_AIRLINE_FAULT: ResponseTemplate = ResponseTemplate {
    id: TemplateId::NegativeAirlineFault,
    instruction: Some(prompts::NEGATIVE_AIRLINE_FAULT_INSTRUCTION),
    reply: prompts::NEGATIVE_AIRLINE_FAULT_REPLY,
};

pub static NEGATIVE_NOT_AIRLINE_FAULT: ResponseTemplate = ResponseTemplate {
    id: TemplateId::NegativeNotAirlineFault,
    instruction: Some(prompts::NEGATIVE_NOT_AIRLINE_FAULT_INSTRUCTION),
    reply: prompts::NEGATIVE_NOT_AIRLINE_FAULT_REPLY,
};

pub static POSITIVE: ResponseTemplate = ResponseTemplate {
    id: TemplateId::Positive,
    instruction: Some(prompts::POSITIVE_INSTRUCTION),
    reply: prompts::POSITIVE_REPLY,
};

pub static FALLBACK_GENERAL: ResponseTemplate = ResponseTemplate {
    id: TemplateId::FallbackGeneral,
    instruction: None,
    reply: prompts::FALLBACK_REPLY,
};

/// One row of the dispatch table
pub struct SelectionRule {
    pub name: &'static str,
    pub applies: fn(Sentiment, FaultAttribution) -> bool,
    pub template: TemplateId,
}

fn negative_airline_fault(sentiment: Sentiment, fault: FaultAttribution) -> bool {
    sentiment == Sentiment::Negative && fault == FaultAttribution::AirlineFault
}

fn negative_not_airline_fault(sentiment: Sentiment, fault: FaultAttribution) -> bool {
    sentiment == Sentiment::Negative && fault == FaultAttribution::NotAirlineFault
}

fn positive(sentiment: Sentiment, _fault: FaultAttribution) -> bool {
    sentiment == Sentiment::Positive
}

fn always(_sentiment: Sentiment, _fault: FaultAttribution) -> bool {
    true
}

/// Dispatch table, highest priority first
pub static SELECTION_RULES: [SelectionRule; 4] = [
    SelectionRule {
        name: "negative and airline fault",
        applies: negative_airline_fault,
        template: TemplateId::NegativeAirlineFault,
    },
    SelectionRule {
        name: "negative and not airline fault",
        applies: negative_not_airline_fault,
        template: TemplateId::NegativeNotAirlineFault,
    },
    SelectionRule {
        name: "positive",
        applies: positive,
        template: TemplateId::Positive,
    },
    SelectionRule {
        name: "default",
        applies: always,
        template: TemplateId::FallbackGeneral,
    },
];

/// Pick the template for a classification outcome
pub fn select_template(sentiment: Sentiment, fault: FaultAttribution) -> TemplateId {
    SELECTION_RULES
        .iter()
        .find(|rule| (rule.applies)(sentiment, fault))
        .map(|rule| rule.template)
        .unwrap_or(TemplateId::FallbackGeneral)
}

/// Whether chosen templates are sent to the generator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    /// Templates with an instruction are rendered by the generator
    #[default]
    Generate,
    /// Every template's reply is shown as-is; no generation calls
    Verbatim,
}

impl FromStr for RenderMode {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "generate" => Ok(RenderMode::Generate),
            "verbatim" => Ok(RenderMode::Verbatim),
            other => Err(RouterError::configuration(format!(
                "unknown render mode '{}', expected 'generate' or 'verbatim'",
                other
            ))),
        }
    }
}

impl fmt::Display for RenderMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderMode::Generate => write!(f, "generate"),
            RenderMode::Verbatim => write!(f, "verbatim"),
        }
    }
}

/// The reply shown to the customer, plus how it was reached
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedResponse {
    pub template: TemplateId,
    pub sentiment: Sentiment,
    pub fault: FaultAttribution,
    pub text: String,
    /// True when the text came from the generator
    pub generated: bool,
}

pub struct ResponseSelector {
    generator: Arc<dyn TextGenerator>,
    render_mode: RenderMode,
}

impl ResponseSelector {
    pub fn new(generator: Arc<dyn TextGenerator>, render_mode: RenderMode) -> Self {
        Self {
            generator,
            render_mode,
        }
    }

    pub fn render_mode(&self) -> RenderMode {
        self.render_mode
    }

    /// Choose the template for the labels and render it for this feedback.
    ///
    /// Fails only when the generation call fails.
    pub async fn select_and_render(
        &self,
        sentiment: Sentiment,
        fault: FaultAttribution,
        text: &FeedbackText,
    ) -> Result<RenderedResponse> {
        let template = select_template(sentiment, fault).template();

        let (rendered, generated) = match (self.render_mode, template.instruction) {
            (RenderMode::Generate, Some(instruction)) => {
                let prompt = prompts::fill(instruction, text.as_str());
                let reply = self.generator.generate(&prompt).await?;
                (reply.trim().to_string(), true)
            }
            _ => (prompts::fill(template.reply, text.as_str()).trim_end().to_string(), false),
        };

        Ok(RenderedResponse {
            template: template.id,
            sentiment,
            fault,
            text: rendered,
            generated,
        })
    }
}
