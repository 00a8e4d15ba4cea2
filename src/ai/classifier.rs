use std::sync::Arc;

use crate::openai::{Api, Sampling, text_completion};

use super::error::AssistantError;
use super::intent::{IntentCategory, is_help_command};
use super::prompt::PromptBuilder;

/// Only a one word label is expected back.
pub const CLASSIFY_SAMPLING: Sampling = Sampling {
    temperature: 0.5,
    max_tokens: 20,
};

/// Maps an utterance to an `IntentCategory` with a single shot text
/// completion.
pub struct Classifier {
    api: Api,
    model: String,
    prompts: Arc<PromptBuilder>,
}

impl Classifier {
    pub fn new(api: Api, model: &str, prompts: Arc<PromptBuilder>) -> Self {
        Self {
            api,
            model: model.to_string(),
            prompts,
        }
    }

    /// Classifies `utterance`. The help command never reaches the
    /// model and an unavailable service yields `IntentCategory::Error`.
    /// A label outside the known categories is returned as
    /// `AssistantError::UnrecognizedCategory`.
    pub async fn classify(&self, utterance: &str) -> Result<IntentCategory, AssistantError> {
        if is_help_command(utterance) {
            return Ok(IntentCategory::Help);
        }

        match self.request_label(utterance).await {
            Ok(label) => {
                tracing::debug!(label = %label.trim(), "Classified utterance");
                label.parse()
            }
            Err(e) => {
                tracing::error!(error = %e, "Classification failed");
                Ok(IntentCategory::Error)
            }
        }
    }

    async fn request_label(&self, utterance: &str) -> Result<String, AssistantError> {
        let prompt = self.prompts.classification(utterance)?;
        text_completion(&prompt, CLASSIFY_SAMPLING, &self.api, &self.model)
            .await
            .map_err(|e| AssistantError::ClassificationUnavailable(e.to_string()))
    }
}
