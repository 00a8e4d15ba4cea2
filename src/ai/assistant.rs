use std::sync::Arc;

use tokio::sync::Mutex;

use crate::core::AppConfig;
use crate::openai::Api;

use super::classifier::Classifier;
use super::error::AssistantError;
use super::history::HistoryStore;
use super::intent::IntentCategory;
use super::prompt::PromptBuilder;
use super::responder::Responder;

pub const HELP_TEXT: &str = "***CodeCruxGPT Bot***
I can answer your programming related questions and I can also help you debug your code.

Example queries:
- What are dictionaries in Python
- Can you find the error in my code: [your code]
- Give me a coding exercise question about Java to practice for my midterm.";

pub const CLASSIFICATION_APOLOGY: &str = "I'm sorry! I didn't quite understand that. Can you please rephrase your question or provide more details?";

pub const GENERATION_APOLOGY: &str =
    "I'm sorry! There was an error processing your request. Please try again.";

/// One conversation with the tutor. Owns the history for its whole
/// lifetime and answers utterances one at a time.
///
/// Use `AssistantBuilder` or `Assistant::from_config` to construct it.
pub struct Assistant {
    classifier: Classifier,
    responder: Responder,
    history: Mutex<HistoryStore>,
}

impl Assistant {
    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        AssistantBuilder::new(config.api())
            .chat_model(&config.chat_model)
            .completion_model(&config.completion_model)
            .build()
    }

    /// Answers `utterance`. Never fails: help and every failure are
    /// answered with fixed text and leave the history as it was.
    ///
    /// The history lock is held for the whole call so concurrent
    /// callers are served strictly in order.
    pub async fn handle(&self, utterance: &str) -> String {
        let mut history = self.history.lock().await;

        let category = match self.classifier.classify(utterance).await {
            Ok(IntentCategory::Help) => return HELP_TEXT.to_string(),
            Ok(IntentCategory::Error) => return CLASSIFICATION_APOLOGY.to_string(),
            Ok(category) => category,
            Err(e) => {
                tracing::warn!(error = %e, "Could not route utterance");
                return GENERATION_APOLOGY.to_string();
            }
        };

        tracing::info!(%category, "Handling utterance");

        match self.responder.respond(category, utterance, &mut history).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, %category, "Response generation failed");
                GENERATION_APOLOGY.to_string()
            }
        }
    }

    /// A copy of the conversation so far.
    pub async fn history(&self) -> HistoryStore {
        self.history.lock().await.clone()
    }
}

pub struct AssistantBuilder {
    api: Api,
    chat_model: String,
    completion_model: String,
    history: HistoryStore,
}

impl AssistantBuilder {
    pub fn new(api: Api) -> Self {
        Self {
            api,
            chat_model: "gpt-4o".to_string(),
            completion_model: "gpt-3.5-turbo-instruct".to_string(),
            history: HistoryStore::new(),
        }
    }

    pub fn chat_model(mut self, model: &str) -> Self {
        self.chat_model = model.to_string();
        self
    }

    pub fn completion_model(mut self, model: &str) -> Self {
        self.completion_model = model.to_string();
        self
    }

    /// Resume from an existing conversation.
    pub fn history(mut self, history: HistoryStore) -> Self {
        self.history = history;
        self
    }

    pub fn build(self) -> Result<Assistant, AssistantError> {
        let prompts = Arc::new(PromptBuilder::new()?);
        Ok(Assistant {
            classifier: Classifier::new(self.api.clone(), &self.completion_model, Arc::clone(&prompts)),
            responder: Responder::new(self.api, &self.chat_model, prompts),
            history: Mutex::new(self.history),
        })
    }
}
