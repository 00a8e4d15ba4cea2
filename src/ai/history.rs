//! The running conversation log for a session.

/// Number of most recent turns given to the model as context.
pub const CONTEXT_WINDOW_TURNS: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Speaker {
    User,
    Assistant,
}

impl Speaker {
    fn label(&self) -> &'static str {
        match self {
            Speaker::User => "User",
            Speaker::Assistant => "Assistant",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Turn {
    role: Speaker,
    content: String,
}

impl Turn {
    pub fn new(role: Speaker, content: &str) -> Self {
        Self {
            role,
            content: content.to_string(),
        }
    }

    pub fn role(&self) -> Speaker {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Append-only log of turns in chronological order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HistoryStore(Vec<Turn>);

impl HistoryStore {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn new_with_turns(turns: Vec<Turn>) -> Self {
        Self(turns)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Turn> {
        self.0.iter()
    }

    /// Records one completed exchange. Taking both halves at once keeps
    /// user/assistant pairs adjacent.
    pub fn record_exchange(&mut self, utterance: &str, reply: &str) {
        self.0.push(Turn::new(Speaker::User, utterance));
        self.0.push(Turn::new(Speaker::Assistant, reply));
    }

    /// The last `CONTEXT_WINDOW_TURNS` turns.
    pub fn context_window(&self) -> ContextWindow<'_> {
        let start = self.0.len().saturating_sub(CONTEXT_WINDOW_TURNS);
        ContextWindow(&self.0[start..])
    }
}

/// Read-only view over the most recent turns of a `HistoryStore`.
#[derive(Clone, Copy, Debug)]
pub struct ContextWindow<'a>(&'a [Turn]);

impl<'a> ContextWindow<'a> {
    pub fn empty() -> Self {
        Self(&[])
    }

    pub fn turns(&self) -> &'a [Turn] {
        self.0
    }

    /// Renders each turn as `User: ...` or `Assistant: ...`. Turns are
    /// joined without a separator.
    pub fn render(&self) -> String {
        self.0
            .iter()
            .map(|t| format!("{}: {}", t.role.label(), t.content))
            .collect()
    }
}
