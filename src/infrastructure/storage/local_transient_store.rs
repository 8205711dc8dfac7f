use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::application::ports::{TransientStore, TransientStoreError};

/// Working directory on the local file system where extracted files land.
pub struct LocalTransientStore {
    root: PathBuf,
}

impl LocalTransientStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl TransientStore for LocalTransientStore {
    async fn prepare(&self) -> Result<(), TransientStoreError> {
        tokio::fs::create_dir_all(&self.root).await?;
        tracing::debug!(root = %self.root.display(), "Working directory ready");
        Ok(())
    }

    async fn remove(&self, path: &Path) -> Result<bool, TransientStoreError> {
        if !tokio::fs::try_exists(path).await? {
            return Ok(false);
        }

        match tokio::fs::remove_file(path).await {
            Ok(()) => Ok(true),
            // Another request may have removed the same identifier in between.
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(TransientStoreError::Io(e)),
        }
    }
}
