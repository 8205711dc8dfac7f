use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::ChatId;

/// Outbound chat capability shared by request handling and the bot listener.
#[async_trait]
pub trait MessagingTransport: Send + Sync {
    async fn send_text(&self, chat_id: &ChatId, text: &str) -> Result<(), MessagingError>;

    async fn send_audio(&self, chat_id: &ChatId, upload: AudioUpload)
    -> Result<(), MessagingError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub path: PathBuf,
    pub caption: String,
    pub title: String,
}

#[derive(Debug, thiserror::Error)]
pub enum MessagingError {
    #[error("request failed: {0}")]
    RequestFailed(String),
    #[error("rejected with status {status}: {description}")]
    Rejected { status: u16, description: String },
    #[error("file unreadable: {0}")]
    FileUnreadable(String),
}
