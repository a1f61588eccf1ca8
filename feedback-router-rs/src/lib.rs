//! # Feedback Router
//!
//! Routes free-text airline trip feedback to one of four response templates
//! and renders the reply.
//!
//! Sentiment is decided first; fault attribution only for negative feedback.
//! Either step can use local keyword heuristics or delegate to a
//! [`generation_sdk::TextGenerator`]. The chosen template is then rendered by
//! the generator, or shown as-is.

pub mod classify;
pub mod config;
pub mod error;
pub mod feedback;
pub mod prompts;
pub mod router;
pub mod selector;
pub mod web;

pub use classify::{ClassifierMode, FaultAttribution, Sentiment};
pub use config::AppConfig;
pub use error::{ClassificationStage, Result, RouterError};
pub use feedback::FeedbackText;
pub use router::{FeedbackRouter, FeedbackRouterBuilder};
pub use selector::{RenderMode, RenderedResponse, ResponseSelector, TemplateId};

#[cfg(test)]
mod tests;
