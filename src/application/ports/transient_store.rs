use std::io;
use std::path::Path;

use async_trait::async_trait;

/// Local scratch space holding extracted files for the duration of one request.
#[async_trait]
pub trait TransientStore: Send + Sync {
    async fn prepare(&self) -> Result<(), TransientStoreError>;

    /// Returns `true` if a file was removed, `false` if it was already gone.
    async fn remove(&self, path: &Path) -> Result<bool, TransientStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum TransientStoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}
