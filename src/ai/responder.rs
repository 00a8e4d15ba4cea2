use std::sync::Arc;

use crate::openai::{Api, Message, Role, Sampling, completion};

use super::error::AssistantError;
use super::history::HistoryStore;
use super::intent::IntentCategory;
use super::prompt::PromptBuilder;

pub const RESPOND_SAMPLING: Sampling = Sampling {
    temperature: 0.7,
    max_tokens: 400,
};

/// Generates the reply for a classified utterance and records the
/// exchange in the history.
pub struct Responder {
    api: Api,
    model: String,
    prompts: Arc<PromptBuilder>,
}

impl Responder {
    pub fn new(api: Api, model: &str, prompts: Arc<PromptBuilder>) -> Self {
        Self {
            api,
            model: model.to_string(),
            prompts,
        }
    }

    /// Sends the category prompt as the system message followed by the
    /// raw utterance as the user message. The history is only updated
    /// when a reply is received.
    pub async fn respond(
        &self,
        category: IntentCategory,
        utterance: &str,
        history: &mut HistoryStore,
    ) -> Result<String, AssistantError> {
        let instruction = self
            .prompts
            .build(category, utterance, &history.context_window())?;

        let messages = vec![
            Message::new(Role::System, &instruction),
            Message::new(Role::User, utterance),
        ];

        let reply = completion(&messages, RESPOND_SAMPLING, &self.api, &self.model)
            .await
            .map_err(|e| AssistantError::GenerationUnavailable(e.to_string()))?;

        history.record_exchange(utterance, &reply);
        tracing::debug!(%category, turns = history.len(), "Recorded exchange");

        Ok(reply)
    }
}
