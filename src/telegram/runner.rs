use std::sync::Arc;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use teloxide::prelude::*;
use tokio::sync::mpsc;

use crate::ai::Assistant;

use super::{Flow, Outbox, on_message};

#[async_trait]
impl Outbox for Bot {
    async fn send_text(&self, chat_id: i64, text: &str) -> Result<()> {
        self.send_message(ChatId(chat_id), text).await?;
        Ok(())
    }
}

#[derive(Clone, Debug)]
struct BotIdentity {
    username: String,
}

/// Asks the listener to stop. Returns false when nothing is waiting
/// for the signal anymore.
fn request_shutdown(shutdown: &mpsc::UnboundedSender<()>) -> bool {
    match shutdown.send(()) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Shutdown signal was not delivered");
            false
        }
    }
}

async fn handle_message(
    bot: Bot,
    msg: Message,
    assistant: Arc<Assistant>,
    identity: BotIdentity,
    shutdown: mpsc::UnboundedSender<()>,
) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    let chat_id = msg.chat.id.0;
    match on_message(&bot, &assistant, &identity.username, chat_id, text).await {
        Ok(Flow::Shutdown) => {
            request_shutdown(&shutdown);
        }
        Ok(Flow::Replied) => {
            tracing::info!(chat_id, "Replied to mention");
        }
        Ok(Flow::Ignored) => {}
        Err(e) => {
            tracing::error!(chat_id, error = %e, "Failed to answer message");
        }
    }

    Ok(())
}

/// Connects with `token` and answers mentions until the shutdown
/// command is received or the process is interrupted.
pub async fn run(token: String, assistant: Arc<Assistant>) -> Result<()> {
    let bot = Bot::new(token);

    let me = bot.get_me().await?;
    let username = me
        .user
        .username
        .clone()
        .ok_or(anyhow!("Bot account has no username to be mentioned by"))?;
    tracing::info!(username = %username, "Logged on");

    let (shutdown_tx, mut shutdown_rx) = mpsc::unbounded_channel::<()>();
    let identity = BotIdentity { username };

    let handler = Update::filter_message().endpoint(handle_message);
    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![assistant, identity, shutdown_tx])
        .enable_ctrlc_handler()
        .build();

    let token = dispatcher.shutdown_token();
    tokio::spawn(async move {
        if shutdown_rx.recv().await.is_some() {
            match token.shutdown() {
                Ok(stopped) => stopped.await,
                Err(e) => tracing::warn!(error = %e, "Dispatcher was not running"),
            }
        }
    });

    dispatcher.dispatch().await;
    tracing::info!("Listener stopped");

    Ok(())
}
