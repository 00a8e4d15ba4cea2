use std::{fmt, str::FromStr};

use super::error::AssistantError;

/// What the user is asking for. `Help` and `Error` are control paths
/// answered with fixed text; the rest are sent to the model.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntentCategory {
    FundamentalQuestions,
    DebugCode,
    QuestionsRequest,
    OtherTopic,
    Help,
    Error,
}

impl IntentCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IntentCategory::FundamentalQuestions => "fundamental_questions",
            IntentCategory::DebugCode => "debug_code",
            IntentCategory::QuestionsRequest => "questions_request",
            IntentCategory::OtherTopic => "other_topic",
            IntentCategory::Help => "help",
            IntentCategory::Error => "error",
        }
    }

    /// True for the categories that produce a generated reply.
    pub fn is_content(&self) -> bool {
        !matches!(self, IntentCategory::Help | IntentCategory::Error)
    }
}

impl fmt::Display for IntentCategory {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a label returned by the classifier. Only the four content
/// categories are accepted; surrounding whitespace and case are
/// ignored.
impl FromStr for IntentCategory {
    type Err = AssistantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fundamental_questions" => Ok(IntentCategory::FundamentalQuestions),
            "debug_code" => Ok(IntentCategory::DebugCode),
            "questions_request" => Ok(IntentCategory::QuestionsRequest),
            "other_topic" => Ok(IntentCategory::OtherTopic),
            _ => Err(AssistantError::UnrecognizedCategory(s.to_string())),
        }
    }
}

/// `.help` in any case with any surrounding whitespace.
pub fn is_help_command(utterance: &str) -> bool {
    utterance.trim().eq_ignore_ascii_case(".help")
}
