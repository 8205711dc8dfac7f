mod delivery_orchestrator;
mod error_excerpt;
mod track_resolver;

pub use delivery_orchestrator::{
    DEFAULT_ERROR_EXCERPT_CHARS, DEFAULT_SIGNATURE, DeliveryOrchestrator, DeliveryPolicy,
};
pub use error_excerpt::{error_excerpt, redact_bot_tokens};
pub use track_resolver::{DEFAULT_TITLE_PLACEHOLDER, ResolutionError, TrackResolver};
