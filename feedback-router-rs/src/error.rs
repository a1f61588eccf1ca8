//! Error taxonomy for a feedback routing run

use std::fmt;

use generation_sdk::ServiceError;
use thiserror::Error;

/// Result type for routing operations
pub type Result<T> = std::result::Result<T, RouterError>;

/// Which delegated classification produced an unusable answer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationStage {
    Sentiment,
    Fault,
}

impl fmt::Display for ClassificationStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sentiment => write!(f, "sentiment"),
            Self::Fault => write!(f, "fault attribution"),
        }
    }
}

/// Everything that can stop a feedback submission from producing a reply
#[derive(Error, Debug)]
pub enum RouterError {
    /// Missing credential or malformed setting; fatal at start
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Submitted feedback rejected before any classifier ran
    #[error("Validation error: {0}")]
    Validation(String),

    /// A delegated classifier answered with no recognized label
    #[error("Could not determine {stage}: unrecognized response {response:?}")]
    Classification {
        stage: ClassificationStage,
        response: String,
    },

    /// The external generation call failed
    #[error("Generation failed: {0}")]
    Generation(#[source] ServiceError),
}

impl RouterError {
    pub fn configuration(message: impl Into<String>) -> Self {
        RouterError::Configuration(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        RouterError::Validation(message.into())
    }

    pub fn classification(stage: ClassificationStage, response: impl Into<String>) -> Self {
        RouterError::Classification {
            stage,
            response: response.into(),
        }
    }

    /// Errors caused by the submitted input rather than by the system
    pub fn is_user_error(&self) -> bool {
        matches!(self, RouterError::Validation(_))
    }
}

impl From<ServiceError> for RouterError {
    fn from(err: ServiceError) -> Self {
        match err.root() {
            ServiceError::Configuration(msg) => RouterError::Configuration(msg.clone()),
            _ => RouterError::Generation(err),
        }
    }
}
