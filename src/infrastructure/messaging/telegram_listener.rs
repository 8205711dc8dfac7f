use std::sync::Arc;
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::application::ports::MessagingTransport;
use crate::domain::ChatId;

use super::telegram_client::{TelegramBotClient, Update};

const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Inbound bot loop answering `/start` and `/help`.
pub struct TelegramListener {
    client: Arc<TelegramBotClient>,
    poll_timeout_secs: u64,
    retry_delay: Duration,
}

impl TelegramListener {
    pub fn new(client: Arc<TelegramBotClient>, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            poll_timeout_secs,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Spawns the polling loop on its own task.
    pub fn start(self) -> ListenerHandle {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(shutdown_rx));
        ListenerHandle {
            shutdown_tx: Some(shutdown_tx),
            task,
        }
    }

    async fn run(self, mut shutdown: oneshot::Receiver<()>) {
        tracing::info!(poll_timeout_secs = self.poll_timeout_secs, "Telegram listener started");
        let mut offset: Option<i64> = None;

        loop {
            let polled = tokio::select! {
                _ = &mut shutdown => break,
                polled = self.client.get_updates(offset, self.poll_timeout_secs) => polled,
            };

            match polled {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        self.dispatch(update).await;
                    }
                }
                Err(e) => {
                    tracing::warn!(error = %e, retry_in_ms = self.retry_delay.as_millis() as u64, "Polling updates failed");
                    tokio::select! {
                        _ = &mut shutdown => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        tracing::info!("Telegram listener stopped");
    }

    async fn dispatch(&self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(command) = message.text.as_deref().and_then(command_name) else {
            return;
        };

        let chat_id = ChatId::from(message.chat.id);
        let reply = match command {
            "start" | "help" => usage_text(&chat_id),
            _ => return,
        };

        tracing::debug!(chat_id = %chat_id, command = command, "Answering bot command");
        if let Err(e) = self.client.send_text(&chat_id, &reply).await {
            tracing::warn!(chat_id = %chat_id, error = %e, "Failed to answer bot command");
        }
    }
}

/// Extracts `start` from `/start` or `/start@SomeBot args`.
pub fn command_name(text: &str) -> Option<&str> {
    let first = text.split_whitespace().next()?;
    let command = first.strip_prefix('/')?;
    let command = command.split('@').next().unwrap_or(command);
    if command.is_empty() {
        None
    } else {
        Some(command)
    }
}

pub fn usage_text(chat_id: &ChatId) -> String {
    format!(
        "👋 Send a song name or a link through the web app and the track will arrive here.\n\nYour chat id: {}",
        chat_id
    )
}

/// Running listener; dropping it also stops the loop.
pub struct ListenerHandle {
    shutdown_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<()>,
}

impl ListenerHandle {
    pub async fn stop(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        if let Err(e) = (&mut self.task).await {
            tracing::error!(error = %e, "Telegram listener task failed");
        }
    }
}
