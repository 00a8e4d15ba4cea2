//! Mention triggered chat platform front end. The pure parts (mention
//! detection, shutdown command, reply splitting) live here; the
//! teloxide wiring is in [`runner`].
pub mod runner;

use anyhow::Result;
use async_trait::async_trait;

use crate::ai::Assistant;

/// Longest message sent in one piece.
pub const MAX_MESSAGE_CHARS: usize = 2000;

pub const FAREWELL: &str = "It was nice chatting with you! Take care! Shutting down...";

/// What the listener should do after a message was processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Ignored,
    Replied,
    Shutdown,
}

/// Sends text to a chat. Implemented for `teloxide::Bot`.
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()>;
}

fn is_username_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Byte ranges of every `@bot_username` mention in `text`, ignoring
/// case. A match followed by another username character belongs to a
/// different account (`@bot_username_dev`) and is skipped.
fn mention_spans(text: &str, bot_username: &str) -> Vec<(usize, usize)> {
    let mention = format!("@{}", bot_username.to_ascii_lowercase());
    // ASCII lowercasing keeps byte offsets aligned with `text`
    let lowered = text.to_ascii_lowercase();
    lowered
        .match_indices(&mention)
        .map(|(start, _)| (start, start + mention.len()))
        .filter(|&(_, end)| !text[end..].chars().next().is_some_and(is_username_char))
        .collect()
}

/// Returns true if `text` mentions `@bot_username`, ignoring case.
pub fn is_bot_mentioned(text: &str, bot_username: &str) -> bool {
    !mention_spans(text, bot_username).is_empty()
}

/// `@bot_username goodbye` in any case is the shutdown command.
pub fn is_goodbye(text: &str, bot_username: &str) -> bool {
    text.trim()
        .eq_ignore_ascii_case(&format!("@{} goodbye", bot_username))
}

/// Strips every `@bot_username` mention from `text` and trims the
/// rest.
pub fn extract_question(text: &str, bot_username: &str) -> String {
    let mut question = String::with_capacity(text.len());
    let mut last = 0;
    for (start, end) in mention_spans(text, bot_username) {
        question.push_str(&text[last..start]);
        last = end;
    }
    question.push_str(&text[last..]);
    question.trim().to_string()
}

/// Splits `text` into consecutive pieces of at most `limit`
/// characters.
pub fn split_reply(text: &str, limit: usize) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(limit.max(1))
        .map(|chunk| chunk.iter().collect())
        .collect()
}

/// Sends `reply` to `chat_id` in order, split to fit the platform limit.
pub async fn deliver(outbox: &dyn Outbox, chat_id: i64, reply: &str) -> Result<()> {
    let chunks = split_reply(reply, MAX_MESSAGE_CHARS);
    if chunks.is_empty() {
        tracing::warn!(chat_id, "Skipping empty reply");
    }
    for chunk in chunks {
        outbox.send_text(chat_id, &chunk).await?;
    }
    Ok(())
}

/// Processes one inbound message. Messages that don't mention the bot
/// are ignored.
pub async fn on_message(
    outbox: &dyn Outbox,
    assistant: &Assistant,
    bot_username: &str,
    chat_id: i64,
    text: &str,
) -> Result<Flow> {
    if !is_bot_mentioned(text, bot_username) {
        return Ok(Flow::Ignored);
    }

    if is_goodbye(text, bot_username) {
        tracing::info!(chat_id, "Shutdown requested");
        outbox.send_text(chat_id, FAREWELL).await?;
        return Ok(Flow::Shutdown);
    }

    let question = extract_question(text, bot_username);
    // A bare mention gets the help text
    let utterance = if question.is_empty() { ".help" } else { question.as_str() };

    let reply = assistant.handle(utterance).await;
    deliver(outbox, chat_id, &reply).await?;

    Ok(Flow::Replied)
}
