use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::application::ports::{
    ExtractedMedia, ExtractionProfile, ExtractorError, MediaExtractor, MediaItem,
};
use crate::domain::{Query, ResolvedTrack};

pub const DEFAULT_TITLE_PLACEHOLDER: &str = "Music";

/// Turns a query into a single extracted audio file plus its metadata.
pub struct TrackResolver<E>
where
    E: MediaExtractor + ?Sized,
{
    extractor: Arc<E>,
    profile: ExtractionProfile,
    title_placeholder: String,
}

impl<E> TrackResolver<E>
where
    E: MediaExtractor + ?Sized,
{
    pub fn new(extractor: Arc<E>, profile: ExtractionProfile) -> Self {
        Self {
            extractor,
            profile,
            title_placeholder: DEFAULT_TITLE_PLACEHOLDER.to_string(),
        }
    }

    pub fn with_title_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.title_placeholder = placeholder.into();
        self
    }

    #[tracing::instrument(skip_all, fields(direct = query.is_direct_locator()))]
    pub async fn resolve(&self, query: &Query) -> Result<ResolvedTrack, ResolutionError> {
        let target = query.extraction_target();
        tracing::debug!(target = %target, "Invoking extractor");

        let media = self.extractor.extract(&target, &self.profile).await?;

        let MediaItem {
            id,
            title,
            file_path,
        } = select_first(media)?;

        let Some(id) = id.filter(|id| !id.trim().is_empty()) else {
            tracing::warn!(orphan = ?file_path, "Extracted item has no identifier");
            return Err(ResolutionError::IncompleteItem { orphan: file_path });
        };

        let title = title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| self.title_placeholder.clone());

        let local_path = match file_path {
            Some(path) => path,
            None => self.profile.output_path_for(&id),
        };

        tracing::info!(track_id = %id, title = %title, path = %local_path.display(), "Track resolved");

        Ok(ResolvedTrack::new(id, title, local_path))
    }
}

fn select_first(media: ExtractedMedia) -> Result<MediaItem, ResolutionError> {
    match media {
        ExtractedMedia::Single(item) => Ok(item),
        ExtractedMedia::Collection(items) => {
            items.into_iter().next().ok_or(ResolutionError::NoMatch)
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ResolutionError {
    #[error("{0}")]
    Extraction(#[from] ExtractorError),
    #[error("no matching track found")]
    NoMatch,
    #[error("extracted item has no identifier")]
    IncompleteItem { orphan: Option<PathBuf> },
}

impl ResolutionError {
    /// A file the extractor wrote even though resolution failed.
    pub fn orphaned_file(&self) -> Option<&Path> {
        match self {
            ResolutionError::IncompleteItem { orphan } => orphan.as_deref(),
            _ => None,
        }
    }
}
