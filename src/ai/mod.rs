//! The tutor pipeline: classify an utterance, build a prompt with
//! recent history, generate a reply and record the exchange.
pub mod assistant;
pub mod classifier;
pub mod error;
pub mod history;
pub mod intent;
pub mod prompt;
pub mod responder;

pub use assistant::{
    Assistant, AssistantBuilder, CLASSIFICATION_APOLOGY, GENERATION_APOLOGY, HELP_TEXT,
};
pub use error::AssistantError;
pub use history::{ContextWindow, HistoryStore, Speaker, Turn};
pub use intent::IntentCategory;
