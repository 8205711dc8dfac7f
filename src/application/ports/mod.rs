mod extraction_profile;
mod media_extractor;
mod messaging_transport;
mod transient_store;

pub use extraction_profile::ExtractionProfile;
pub use media_extractor::{ExtractedMedia, ExtractorError, MediaExtractor, MediaItem};
pub use messaging_transport::{AudioUpload, MessagingError, MessagingTransport};
pub use transient_store::{TransientStore, TransientStoreError};
