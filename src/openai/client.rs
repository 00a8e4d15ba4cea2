use std::{fmt, time::Duration};

use anyhow::{Error, Result, anyhow};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "system")]
    System,
    #[serde(rename = "assistant")]
    Assistant,
    #[serde(rename = "user")]
    User,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn new(role: Role, content: &str) -> Self {
        Message {
            role,
            content: content.to_string(),
        }
    }
}

/// Sampling settings sent along with a request.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sampling {
    pub temperature: f64,
    pub max_tokens: u32,
}

/// Connection settings for an OpenAI compatible API. Every request is
/// bounded by `timeout` and retried up to `max_retries` times with an
/// exponential backoff starting at `retry_backoff`.
#[derive(Clone)]
pub struct Api {
    pub api_hostname: String,
    pub api_key: String,
    pub timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
}

impl Api {
    pub fn new(api_hostname: &str, api_key: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
            retry_backoff: Duration::from_millis(500),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_hostname.trim_end_matches("/"), path)
    }
}

impl fmt::Debug for Api {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Api")
            .field("api_hostname", &self.api_hostname)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .finish()
    }
}

async fn post_json(api: &Api, path: &str, payload: &Value) -> Result<Value, Error> {
    let url = api.url(path);
    let client = reqwest::Client::new();
    let mut attempt = 0;

    loop {
        let result: Result<Value, reqwest::Error> = async {
            client
                .post(&url)
                .bearer_auth(&api.api_key)
                .header("Content-Type", "application/json")
                .timeout(api.timeout)
                .json(payload)
                .send()
                .await?
                .error_for_status()?
                .json()
                .await
        }
        .await;

        match result {
            Ok(resp) => return Ok(resp),
            Err(e) if attempt < api.max_retries => {
                let delay = api.retry_backoff.saturating_mul(2u32.saturating_pow(attempt));
                attempt += 1;
                tracing::warn!(
                    url = %url,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Request failed, retrying"
                );
                tokio::time::sleep(delay).await;
            }
            Err(e) => {
                return Err(anyhow!("Request to {} failed after {} attempts: {}", url, attempt + 1, e));
            }
        }
    }
}

/// Runs a chat completion over `messages` and returns the content of
/// the first choice.
pub async fn completion(
    messages: &[Message],
    sampling: Sampling,
    api: &Api,
    model: &str,
) -> Result<String, Error> {
    let payload = json!({
        "model": model,
        "messages": messages,
        "temperature": sampling.temperature,
        "max_tokens": sampling.max_tokens,
    });
    let resp = post_json(api, "/v1/chat/completions", &payload).await?;

    resp["choices"][0]["message"]["content"]
        .as_str()
        .map(String::from)
        .ok_or(anyhow!("No message received. Resp:\n\n {}", resp))
}

/// Runs a single shot text completion for `prompt` and returns the raw
/// text of the first choice.
pub async fn text_completion(
    prompt: &str,
    sampling: Sampling,
    api: &Api,
    model: &str,
) -> Result<String, Error> {
    let payload = json!({
        "model": model,
        "prompt": prompt,
        "temperature": sampling.temperature,
        "max_tokens": sampling.max_tokens,
    });
    let resp = post_json(api, "/v1/completions", &payload).await?;

    resp["choices"][0]["text"]
        .as_str()
        .map(String::from)
        .ok_or(anyhow!("No completion text received. Resp:\n\n {}", resp))
}
