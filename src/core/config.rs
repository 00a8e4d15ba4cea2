use std::{env, fmt, fs, time::Duration};

use anyhow::{Context, Result, anyhow};

use crate::openai::Api;

#[derive(Clone)]
pub struct AppConfig {
    pub openai_api_hostname: String,
    pub openai_api_key: String,
    pub chat_model: String,
    pub completion_model: String,
    pub request_timeout: Duration,
    pub max_retries: u32,
    pub retry_backoff: Duration,
    pub bot_token: Option<String>,
    pub bot_token_path: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let openai_api_hostname = env::var("CODECRUX_LLM_HOST")
            .unwrap_or_else(|_| "https://api.openai.com".to_string());
        let openai_api_key =
            env::var("OPENAI_API_KEY").unwrap_or_else(|_| "thiswontworkforopenai".to_string());
        let chat_model =
            env::var("CODECRUX_CHAT_MODEL").unwrap_or_else(|_| "gpt-4o".to_string());
        let completion_model = env::var("CODECRUX_COMPLETION_MODEL")
            .unwrap_or_else(|_| "gpt-3.5-turbo-instruct".to_string());
        let request_timeout = env::var("CODECRUX_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(30));
        let max_retries = env::var("CODECRUX_MAX_RETRIES")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .unwrap_or(2);
        let bot_token = env::var("CODECRUX_BOT_TOKEN").ok();
        let bot_token_path =
            env::var("CODECRUX_BOT_TOKEN_PATH").unwrap_or_else(|_| "bot_token.txt".to_string());

        Self {
            openai_api_hostname,
            openai_api_key,
            chat_model,
            completion_model,
            request_timeout,
            max_retries,
            retry_backoff: Duration::from_millis(500),
            bot_token,
            bot_token_path,
        }
    }
}

impl AppConfig {
    /// Connection settings for the OpenAI compatible API.
    pub fn api(&self) -> Api {
        Api {
            api_hostname: self.openai_api_hostname.clone(),
            api_key: self.openai_api_key.clone(),
            timeout: self.request_timeout,
            max_retries: self.max_retries,
            retry_backoff: self.retry_backoff,
        }
    }

    /// Resolves the chat platform token. The env var wins over the
    /// token file.
    pub fn resolve_bot_token(&self) -> Result<String> {
        if let Some(token) = &self.bot_token {
            return Ok(token.trim().to_string());
        }
        let token = fs::read_to_string(&self.bot_token_path)
            .with_context(|| format!("Failed to read bot token from {}", self.bot_token_path))?;
        let token = token.trim();
        if token.is_empty() {
            return Err(anyhow!("Bot token file {} is empty", self.bot_token_path));
        }
        Ok(token.to_string())
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("openai_api_hostname", &self.openai_api_hostname)
            .field("openai_api_key", &"[REDACTED]")
            .field("chat_model", &self.chat_model)
            .field("completion_model", &self.completion_model)
            .field("request_timeout", &self.request_timeout)
            .field("max_retries", &self.max_retries)
            .field("retry_backoff", &self.retry_backoff)
            .field("bot_token", &self.bot_token.as_ref().map(|_| "[REDACTED]"))
            .field("bot_token_path", &self.bot_token_path)
            .finish()
    }
}
