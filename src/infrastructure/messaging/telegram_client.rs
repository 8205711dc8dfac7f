use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::application::ports::{AudioUpload, MessagingError, MessagingTransport};
use crate::domain::ChatId;

const POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client shared by the HTTP path and the update listener.
pub struct TelegramBotClient {
    client: reqwest::Client,
    bot_url: String,
}

impl TelegramBotClient {
    pub fn new(api_base_url: &str, bot_token: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            bot_url: format!("{}/bot{}", api_base_url.trim_end_matches('/'), bot_token),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/{}", self.bot_url, method)
    }

    /// Long-polls for updates after `offset`.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout_secs: u64,
    ) -> Result<Vec<Update>, MessagingError> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let request = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(Duration::from_secs(timeout_secs) + POLL_GRACE)
            .json(&body);

        self.call(request).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, MessagingError> {
        // Errors are stripped of their URL, which embeds the bot token.
        let response = request
            .send()
            .await
            .map_err(|e| MessagingError::RequestFailed(e.without_url().to_string()))?;

        let status = response.status();
        let envelope: ApiResponse<T> = match response.json().await {
            Ok(envelope) => envelope,
            Err(e) if status.is_success() => {
                return Err(MessagingError::RequestFailed(format!(
                    "body: {}",
                    e.without_url()
                )));
            }
            Err(_) => {
                return Err(MessagingError::Rejected {
                    status: status.as_u16(),
                    description: status
                        .canonical_reason()
                        .unwrap_or("unknown error")
                        .to_string(),
                });
            }
        };

        if !status.is_success() || !envelope.ok {
            return Err(MessagingError::Rejected {
                status: envelope.error_code.unwrap_or(status.as_u16()),
                description: envelope
                    .description
                    .unwrap_or_else(|| "no description".to_string()),
            });
        }

        envelope
            .result
            .ok_or_else(|| MessagingError::RequestFailed("response without result".to_string()))
    }
}

#[async_trait]
impl MessagingTransport for TelegramBotClient {
    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<(), MessagingError> {
        let request = self.client.post(self.method_url("sendMessage")).json(&json!({
            "chat_id": chat_id.as_str(),
            "text": text,
        }));

        let _: serde_json::Value = self.call(request).await?;
        tracing::debug!(chat_id = %chat_id, "Text message sent");
        Ok(())
    }

    async fn send_audio(
        &self,
        chat_id: &ChatId,
        upload: AudioUpload,
    ) -> Result<(), MessagingError> {
        let data = tokio::fs::read(&upload.path).await.map_err(|e| {
            MessagingError::FileUnreadable(format!("{}: {}", upload.path.display(), e))
        })?;
        let size = data.len();

        let part = multipart::Part::bytes(data)
            .file_name(file_name(&upload.path))
            .mime_str(mime_for(&upload.path))
            .map_err(|e| MessagingError::RequestFailed(format!("mime: {}", e)))?;

        let form = multipart::Form::new()
            .text("chat_id", chat_id.as_str().to_string())
            .text("caption", upload.caption)
            .text("title", upload.title)
            .part("audio", part);

        tracing::debug!(chat_id = %chat_id, bytes = size, "Uploading audio");

        let request = self
            .client
            .post(self.method_url("sendAudio"))
            .multipart(form);

        let _: serde_json::Value = self.call(request).await?;
        tracing::info!(chat_id = %chat_id, bytes = size, "Audio sent");
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "audio".to_string())
}

fn mime_for(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        Some("ogg") | Some("opus") => "audio/ogg",
        _ => "application/octet-stream",
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    description: Option<String>,
    error_code: Option<u16>,
    result: Option<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}
