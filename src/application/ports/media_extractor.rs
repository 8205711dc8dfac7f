use std::path::PathBuf;

use async_trait::async_trait;

use super::ExtractionProfile;

/// External capability that downloads and transcodes media.
#[async_trait]
pub trait MediaExtractor: Send + Sync {
    async fn extract(
        &self,
        target: &str,
        profile: &ExtractionProfile,
    ) -> Result<ExtractedMedia, ExtractorError>;
}

/// Normalized shape of the extractor's answer.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractedMedia {
    Single(MediaItem),
    Collection(Vec<MediaItem>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaItem {
    pub id: Option<String>,
    pub title: Option<String>,
    /// Final path written by the extractor, when it reports one.
    pub file_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error)]
pub enum ExtractorError {
    #[error("extractor unavailable: {0}")]
    Unavailable(String),
    #[error("extraction failed: {0}")]
    Failed(String),
    #[error("extraction timed out after {0}s")]
    TimedOut(u64),
    #[error("malformed extractor output: {0}")]
    MalformedOutput(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
