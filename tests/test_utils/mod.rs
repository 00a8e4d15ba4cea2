//! Test utilities for integration tests
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use mockito::{Mock, ServerGuard};
use serde_json::json;

use codecrux::ai::{Assistant, AssistantBuilder};
use codecrux::openai::Api;
use codecrux::telegram::Outbox;

/// Creates an assistant that talks to the mock server without retries.
pub fn test_assistant(server: &ServerGuard) -> Assistant {
    let api = Api {
        max_retries: 0,
        retry_backoff: Duration::from_millis(0),
        ..Api::new(&server.url(), "test-api-key")
    };
    AssistantBuilder::new(api)
        .build()
        .expect("Failed to build assistant")
}

/// Mocks the classifier returning `label`.
pub async fn mock_label(server: &mut ServerGuard, label: &str) -> Mock {
    server
        .mock("POST", "/v1/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"choices": [{"index": 0, "text": label}]}).to_string())
        .create_async()
        .await
}

/// Mocks the chat completion returning `content`.
pub async fn mock_reply(server: &mut ServerGuard, content: &str) -> Mock {
    server
        .mock("POST", "/v1/chat/completions")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            json!({
                "choices": [{
                    "index": 0,
                    "message": {"role": "assistant", "content": content},
                    "finish_reason": "stop"
                }]
            })
            .to_string(),
        )
        .create_async()
        .await
}

/// Records every message instead of sending it.
#[derive(Default)]
pub struct RecordingOutbox {
    pub sent: Mutex<Vec<(i64, String)>>,
}

impl RecordingOutbox {
    pub fn sent(&self) -> Vec<(i64, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}
