use thiserror::Error;

use super::intent::IntentCategory;

/// Failures of the assistant pipeline. None of these escape
/// `Assistant::handle`, which degrades each one to a canned reply.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssistantError {
    #[error("classification unavailable: {0}")]
    ClassificationUnavailable(String),

    #[error("generation unavailable: {0}")]
    GenerationUnavailable(String),

    #[error("unrecognized category label: {0:?}")]
    UnrecognizedCategory(String),

    #[error("no prompt for category {0}")]
    NoPrompt(IntentCategory),

    #[error("prompt rendering failed: {0}")]
    Prompt(String),
}
