//! Prompts for classifying and answering utterances, rendered with
//! Handlebars. Escaping is turned off so the user's text and the
//! conversation history reach the model verbatim.

use std::fmt;

use handlebars::Handlebars;
use serde_json::json;

use super::error::AssistantError;
use super::history::ContextWindow;
use super::intent::IntentCategory;

#[derive(Debug, Clone, Copy)]
pub enum Prompt {
    Classify,
    FundamentalQuestions,
    DebugCode,
    QuestionsRequest,
    OtherTopic,
}

impl fmt::Display for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl TryFrom<IntentCategory> for Prompt {
    type Error = AssistantError;

    fn try_from(category: IntentCategory) -> Result<Self, Self::Error> {
        match category {
            IntentCategory::FundamentalQuestions => Ok(Prompt::FundamentalQuestions),
            IntentCategory::DebugCode => Ok(Prompt::DebugCode),
            IntentCategory::QuestionsRequest => Ok(Prompt::QuestionsRequest),
            IntentCategory::OtherTopic => Ok(Prompt::OtherTopic),
            IntentCategory::Help | IntentCategory::Error => Err(AssistantError::NoPrompt(category)),
        }
    }
}

const CLASSIFY_PROMPT: &str = r"Classify the following utterance about programming or computer science into exactly one of these categories:
- fundamental_questions: asks for an explanation of, or more information about, a fundamental concept of programming, a programming language, or computer science.
- debug_code: is about finding, debugging or fixing errors in code, or about improving the performance of code.
- questions_request: asks for programming practice questions or exercises, for an exam or just for training.
- other_topic: is not related to programming or computer science.

Utterance: {{utterance}}

Respond with the category name only.";

const FUNDAMENTAL_QUESTIONS_PROMPT: &str = r"You are a very helpful programming mentor. Explain the programming question or concept as simply as possible, using examples or analogies where they help. Keep the explanation clear and beginner friendly, in a professional and friendly tone. Check the previous chat history in case the user is asking about code or concepts from earlier in the conversation.

Previous chat history: {{context}}

Current query: {{utterance}}";

const DEBUG_CODE_PROMPT: &str = r"You are a very helpful programming mentor. Explain how to debug and fix the code errors as simply as possible, using examples or analogies where they help. Give clear step-by-step guidance in a professional and friendly tone. If the user asks you to find an error but did not include any code, look for code to debug in the previous chat history.

Previous chat history: {{context}}

Current query: {{utterance}}";

const QUESTIONS_REQUEST_PROMPT: &str = r"You are a very helpful programming mentor. Create questions or coding exercises that fit the request, with an appropriate difficulty. Add hints for the coding exercises where necessary. Check the previous chat history for anything connected to the current query.

Previous chat history: {{context}}

Current query: {{utterance}}";

const OTHER_TOPIC_PROMPT: &str = r"You are a very helpful programming mentor focused on programming questions. If the query is a greeting or something similar, greet the user back. Otherwise, politely explain why the query is not related to programming or computer science and let the user know that you can answer questions about programming or computer science.

Current query: {{utterance}}";

pub fn templates<'a>() -> Result<Handlebars<'a>, AssistantError> {
    let mut registry = Handlebars::new();
    registry.set_strict_mode(true);
    registry.register_escape_fn(handlebars::no_escape);

    let sources = [
        (Prompt::Classify, CLASSIFY_PROMPT),
        (Prompt::FundamentalQuestions, FUNDAMENTAL_QUESTIONS_PROMPT),
        (Prompt::DebugCode, DEBUG_CODE_PROMPT),
        (Prompt::QuestionsRequest, QUESTIONS_REQUEST_PROMPT),
        (Prompt::OtherTopic, OTHER_TOPIC_PROMPT),
    ];
    for (prompt, source) in sources {
        registry
            .register_template_string(&prompt.to_string(), source)
            .map_err(|e| AssistantError::Prompt(e.to_string()))?;
    }

    Ok(registry)
}

/// Builds the instruction text sent to the model for an utterance.
pub struct PromptBuilder {
    registry: Handlebars<'static>,
}

impl PromptBuilder {
    pub fn new() -> Result<Self, AssistantError> {
        Ok(Self {
            registry: templates()?,
        })
    }

    /// The instruction used to classify `utterance`.
    pub fn classification(&self, utterance: &str) -> Result<String, AssistantError> {
        self.render(Prompt::Classify, "", utterance)
    }

    /// The instruction used to answer `utterance` in the given category.
    /// The off topic prompt never includes the context window.
    pub fn build(
        &self,
        category: IntentCategory,
        utterance: &str,
        context: &ContextWindow<'_>,
    ) -> Result<String, AssistantError> {
        let prompt = Prompt::try_from(category)?;
        let context = match prompt {
            Prompt::OtherTopic => String::new(),
            _ => context.render(),
        };
        self.render(prompt, &context, utterance)
    }

    fn render(&self, prompt: Prompt, context: &str, utterance: &str) -> Result<String, AssistantError> {
        let data = json!({
            "context": context,
            "utterance": utterance,
        });
        self.registry
            .render(&prompt.to_string(), &data)
            .map_err(|e| AssistantError::Prompt(e.to_string()))
    }
}
