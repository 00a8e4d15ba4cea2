//! End to end tests for the assistant and the chat platform front end

mod test_utils;

#[cfg(test)]
mod tests {
    use codecrux::ai::{
        CLASSIFICATION_APOLOGY, GENERATION_APOLOGY, HELP_TEXT, HistoryStore, Speaker, Turn,
    };
    use codecrux::telegram::{FAREWELL, Flow, MAX_MESSAGE_CHARS, on_message};

    use crate::test_utils::{RecordingOutbox, mock_label, mock_reply, test_assistant};

    const BOT: &str = "CodeCruxBot";
    const CHAT: i64 = 42;

    /// A first question is answered and recorded
    #[tokio::test]
    async fn it_answers_a_fundamental_question() {
        let mut server = mockito::Server::new_async().await;
        let label = mock_label(&mut server, "fundamental_questions").await;
        let reply = mock_reply(&mut server, "A variable stores a value.").await;

        let assistant = test_assistant(&server);
        let answer = assistant.handle("What is a variable?").await;

        label.assert_async().await;
        reply.assert_async().await;
        assert_eq!(answer, "A variable stores a value.");
        assert_eq!(
            assistant.history().await,
            HistoryStore::new_with_turns(vec![
                Turn::new(Speaker::User, "What is a variable?"),
                Turn::new(Speaker::Assistant, "A variable stores a value."),
            ])
        );
    }

    /// The help command is answered locally
    #[tokio::test]
    async fn it_answers_help_without_the_model() {
        let mut server = mockito::Server::new_async().await;
        let label = server
            .mock("POST", "/v1/completions")
            .expect(0)
            .create_async()
            .await;

        let assistant = test_assistant(&server);
        assert_eq!(assistant.handle(".HELP  ").await, HELP_TEXT);

        label.assert_async().await;
        assert_eq!(assistant.history().await.len(), 0);
    }

    /// An unreachable classifier degrades to an apology
    #[tokio::test]
    async fn it_apologizes_when_classification_fails() {
        let mut server = mockito::Server::new_async().await;
        let _label = server
            .mock("POST", "/v1/completions")
            .with_status(503)
            .create_async()
            .await;

        let assistant = test_assistant(&server);
        assert_eq!(assistant.handle("What is a map?").await, CLASSIFICATION_APOLOGY);
        assert!(assistant.history().await.is_empty());
    }

    /// An unreachable chat model degrades to an apology
    #[tokio::test]
    async fn it_apologizes_when_generation_fails() {
        let mut server = mockito::Server::new_async().await;
        let _label = mock_label(&mut server, "debug_code").await;
        let _reply = server
            .mock("POST", "/v1/chat/completions")
            .with_status(500)
            .create_async()
            .await;

        let assistant = test_assistant(&server);
        assert_eq!(assistant.handle("Why does this crash?").await, GENERATION_APOLOGY);
        assert!(assistant.history().await.is_empty());
    }

    /// Long replies are split into ordered pieces for the same chat
    #[tokio::test]
    async fn it_splits_long_replies_for_the_chat_platform() {
        let mut server = mockito::Server::new_async().await;
        let long_reply = format!("{}{}{}", "a".repeat(2000), "b".repeat(2000), "c".repeat(500));
        let _label = mock_label(&mut server, "questions_request").await;
        let _reply = mock_reply(&mut server, &long_reply).await;

        let assistant = test_assistant(&server);
        let outbox = RecordingOutbox::default();
        let flow = on_message(&outbox, &assistant, BOT, CHAT, "@CodeCruxBot quiz me on Rust")
            .await
            .unwrap();

        assert_eq!(flow, Flow::Replied);
        let sent = outbox.sent();
        assert_eq!(sent.len(), 3);
        assert!(sent.iter().all(|(chat, _)| *chat == CHAT));
        assert!(sent.iter().all(|(_, text)| text.chars().count() <= MAX_MESSAGE_CHARS));
        assert_eq!(sent[0].1, "a".repeat(2000));
        assert_eq!(sent[1].1, "b".repeat(2000));
        assert_eq!(sent[2].1, "c".repeat(500));

        // The mention is not part of the recorded utterance
        let history = assistant.history().await;
        assert_eq!(history.turns()[0].content(), "quiz me on Rust");
        assert_eq!(history.turns()[1].content(), long_reply);
    }

    /// Messages without a mention are ignored
    #[tokio::test]
    async fn it_ignores_messages_without_a_mention() {
        let mut server = mockito::Server::new_async().await;
        let label = server
            .mock("POST", "/v1/completions")
            .expect(0)
            .create_async()
            .await;

        let assistant = test_assistant(&server);
        let outbox = RecordingOutbox::default();
        let flow = on_message(&outbox, &assistant, BOT, CHAT, "what is a list?")
            .await
            .unwrap();

        label.assert_async().await;
        assert_eq!(flow, Flow::Ignored);
        assert!(outbox.sent().is_empty());
    }

    /// A longer username that starts with the bot's name is not a mention
    #[tokio::test]
    async fn it_ignores_mentions_of_similarly_named_accounts() {
        let mut server = mockito::Server::new_async().await;
        let label = server
            .mock("POST", "/v1/completions")
            .expect(0)
            .create_async()
            .await;

        let assistant = test_assistant(&server);
        let outbox = RecordingOutbox::default();
        for text in ["@CodeCruxBot_dev what is a list?", "@codecruxbot2 goodbye"] {
            let flow = on_message(&outbox, &assistant, BOT, CHAT, text).await.unwrap();
            assert_eq!(flow, Flow::Ignored);
        }

        label.assert_async().await;
        assert!(outbox.sent().is_empty());
        assert!(assistant.history().await.is_empty());
    }

    /// The goodbye command says farewell and stops the listener
    #[tokio::test]
    async fn it_shuts_down_on_goodbye() {
        let server = mockito::Server::new_async().await;
        let assistant = test_assistant(&server);
        let outbox = RecordingOutbox::default();

        let flow = on_message(&outbox, &assistant, BOT, CHAT, "@codecruxbot GOODBYE")
            .await
            .unwrap();

        assert_eq!(flow, Flow::Shutdown);
        assert_eq!(outbox.sent(), vec![(CHAT, FAREWELL.to_string())]);
        assert!(assistant.history().await.is_empty());
    }

    /// A bare mention is answered with the help text
    #[tokio::test]
    async fn it_answers_a_bare_mention_with_help() {
        let server = mockito::Server::new_async().await;
        let assistant = test_assistant(&server);
        let outbox = RecordingOutbox::default();

        let flow = on_message(&outbox, &assistant, BOT, CHAT, "@CodeCruxBot")
            .await
            .unwrap();

        assert_eq!(flow, Flow::Replied);
        assert_eq!(outbox.sent(), vec![(CHAT, HELP_TEXT.to_string())]);
    }

    /// Earlier turns are carried into later prompts
    #[tokio::test]
    async fn it_includes_recent_history_in_the_prompt() {
        let mut server = mockito::Server::new_async().await;
        let _label = mock_label(&mut server, "debug_code").await;
        let first = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::Regex(
                "Current query: My loop never ends".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Paste your code."}}]}"#)
            .create_async()
            .await;

        let assistant = test_assistant(&server);
        assert_eq!(assistant.handle("My loop never ends").await, "Paste your code.");
        first.assert_async().await;

        let second = server
            .mock("POST", "/v1/chat/completions")
            .match_body(mockito::Matcher::Regex(
                "Previous chat history: User: My loop never endsAssistant: Paste your code.".to_string(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"choices": [{"message": {"role": "assistant", "content": "Use i += 1."}}]}"#)
            .create_async()
            .await;

        assert_eq!(assistant.handle("while i < 3: print(i)").await, "Use i += 1.");
        second.assert_async().await;
        assert_eq!(assistant.history().await.len(), 4);
    }
}
