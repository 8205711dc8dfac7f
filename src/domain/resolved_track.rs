use std::path::PathBuf;

/// A track that has been extracted to a file in the transient working directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub id: String,
    pub title: String,
    pub local_path: PathBuf,
}

impl ResolvedTrack {
    pub fn new(id: String, title: String, local_path: PathBuf) -> Self {
        Self {
            id,
            title,
            local_path,
        }
    }
}
