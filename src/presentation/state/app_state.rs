use std::sync::Arc;

use crate::application::ports::{MediaExtractor, MessagingTransport};
use crate::application::services::DeliveryOrchestrator;

pub struct AppState<E, M>
where
    E: MediaExtractor + ?Sized,
    M: MessagingTransport + ?Sized,
{
    pub orchestrator: Arc<DeliveryOrchestrator<E, M>>,
}

impl<E, M> Clone for AppState<E, M>
where
    E: MediaExtractor + ?Sized,
    M: MessagingTransport + ?Sized,
{
    fn clone(&self) -> Self {
        Self {
            orchestrator: Arc::clone(&self.orchestrator),
        }
    }
}
