use std::path::Path;
use std::sync::Arc;

use crate::application::ports::{
    AudioUpload, MediaExtractor, MessagingError, MessagingTransport, TransientStore,
};
use crate::domain::{ChatId, DeliveryOutcome, DeliveryStage, Query};

use super::error_excerpt::error_excerpt;
use super::track_resolver::{ResolutionError, TrackResolver};

pub const DEFAULT_SIGNATURE: &str = "@Gemini_Partner";
pub const DEFAULT_ERROR_EXCERPT_CHARS: usize = 200;

/// User-facing wording and bounds applied by the orchestrator.
#[derive(Debug, Clone)]
pub struct DeliveryPolicy {
    pub signature: String,
    pub error_excerpt_chars: usize,
}

impl Default for DeliveryPolicy {
    fn default() -> Self {
        Self {
            signature: DEFAULT_SIGNATURE.to_string(),
            error_excerpt_chars: DEFAULT_ERROR_EXCERPT_CHARS,
        }
    }
}

impl DeliveryPolicy {
    pub fn searching_notice(&self, query: &Query) -> String {
        format!("🔎 Searching for \"{}\", please wait...", query)
    }

    pub fn caption(&self, title: &str) -> String {
        format!("🎵 {} is ready!\n\n{}", title, self.signature)
    }

    pub fn failure_notice(&self, excerpt: &str) -> String {
        format!("❌ Could not deliver your track: {}", excerpt)
    }
}

/// Sequences notify, resolve, deliver and cleanup for one request.
pub struct DeliveryOrchestrator<E, M>
where
    E: MediaExtractor + ?Sized,
    M: MessagingTransport + ?Sized,
{
    resolver: Arc<TrackResolver<E>>,
    transport: Arc<M>,
    store: Arc<dyn TransientStore>,
    policy: DeliveryPolicy,
}

impl<E, M> DeliveryOrchestrator<E, M>
where
    E: MediaExtractor + ?Sized,
    M: MessagingTransport + ?Sized,
{
    pub fn new(
        resolver: Arc<TrackResolver<E>>,
        transport: Arc<M>,
        store: Arc<dyn TransientStore>,
        policy: DeliveryPolicy,
    ) -> Self {
        Self {
            resolver,
            transport,
            store,
            policy,
        }
    }

    /// Runs the full delivery sequence. Every failure is reported to the chat
    /// and folded into the returned outcome.
    #[tracing::instrument(skip_all, fields(chat_id = %chat_id))]
    pub async fn handle(&self, chat_id: &ChatId, query: &Query) -> DeliveryOutcome {
        let mut stage = StageTracker::default();

        match self.run(chat_id, query, &mut stage).await {
            Ok(()) => {
                stage.advance(DeliveryStage::Done);
                DeliveryOutcome::Success
            }
            Err(e) => {
                let failed_at = stage.current();
                stage.advance(DeliveryStage::Failed);

                let excerpt = error_excerpt(&e.to_string(), self.policy.error_excerpt_chars);
                tracing::warn!(failed_at = %failed_at, error = %excerpt, "Delivery failed");

                let notice = self.policy.failure_notice(&excerpt);
                if let Err(notify_err) = self.transport.send_text(chat_id, &notice).await {
                    tracing::error!(error = %notify_err, "Failed to send failure notice");
                }

                DeliveryOutcome::failure(excerpt)
            }
        }
    }

    async fn run(
        &self,
        chat_id: &ChatId,
        query: &Query,
        stage: &mut StageTracker,
    ) -> Result<(), DeliveryError> {
        stage.advance(DeliveryStage::Notifying);
        self.transport
            .send_text(chat_id, &self.policy.searching_notice(query))
            .await
            .map_err(DeliveryError::Notification)?;

        stage.advance(DeliveryStage::Resolving);
        let track = match self.resolver.resolve(query).await {
            Ok(track) => track,
            Err(e) => {
                if let Some(orphan) = e.orphaned_file() {
                    stage.advance(DeliveryStage::Cleaning);
                    self.cleanup(orphan).await;
                }
                return Err(DeliveryError::Resolution(e));
            }
        };

        stage.advance(DeliveryStage::Delivering);
        let upload = AudioUpload {
            path: track.local_path.clone(),
            caption: self.policy.caption(&track.title),
            title: track.title.clone(),
        };
        let delivered = self.transport.send_audio(chat_id, upload).await;

        stage.advance(DeliveryStage::Cleaning);
        self.cleanup(&track.local_path).await;

        delivered.map_err(DeliveryError::Delivery)?;

        tracing::info!(track_id = %track.id, title = %track.title, "Track delivered");
        Ok(())
    }

    async fn cleanup(&self, path: &Path) {
        match self.store.remove(path).await {
            Ok(true) => tracing::debug!(path = %path.display(), "Transient file removed"),
            Ok(false) => tracing::debug!(path = %path.display(), "Transient file already gone"),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to remove transient file")
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
enum DeliveryError {
    #[error("notification failed: {0}")]
    Notification(MessagingError),
    #[error("{0}")]
    Resolution(ResolutionError),
    #[error("delivery failed: {0}")]
    Delivery(MessagingError),
}

#[derive(Debug, Default)]
struct StageTracker {
    current: DeliveryStage,
}

impl StageTracker {
    fn current(&self) -> DeliveryStage {
        self.current
    }

    fn advance(&mut self, next: DeliveryStage) {
        tracing::debug!(from = %self.current, to = %next, "Delivery stage transition");
        self.current = next;
    }
}
