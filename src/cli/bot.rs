use std::sync::Arc;

use anyhow::Result;

use crate::ai::Assistant;
use crate::core::AppConfig;
use crate::telegram;

pub async fn run(config: &AppConfig) -> Result<()> {
    let token = config.resolve_bot_token()?;
    let assistant = Arc::new(Assistant::from_config(config)?);

    tracing::debug!(config = ?config, "Starting chat platform listener");
    telegram::runner::run(token, assistant).await
}
