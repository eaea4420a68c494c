use crate::error::{CopyError, PathError};
use crate::services::fetcher::ObjectFetcher;
use crate::utils::path::ensure_target;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Copies one remote key to its place under the local root.
pub struct CopyWorker {
    fetcher: ObjectFetcher,
    local_root: PathBuf,
}

impl CopyWorker {
    pub fn new(fetcher: ObjectFetcher, local_root: impl Into<PathBuf>) -> Self {
        Self {
            fetcher,
            local_root: local_root.into(),
        }
    }

    /// Map the path, download, then overwrite the local file, logging the
    /// outcome. Stops at the first failing step, so a failed download never
    /// leaves a file behind. Failures are handed back, never raised further.
    pub async fn run(&self, key: String) -> Result<PathBuf, CopyError> {
        let path = match ensure_target(&self.local_root, &key).await {
            Ok(path) => path,
            Err(e) => {
                error!(key = %key, root = %self.local_root.display(), "{}", e);
                return Err(e.into());
            }
        };

        match self.download_to(&key, &path).await {
            Ok(()) => {
                info!(key = %key, "Copied: {}", path.display());
                Ok(path)
            }
            Err(e) => {
                error!(key = %key, path = %path.display(), "{}", e);
                Err(e)
            }
        }
    }

    async fn download_to(&self, key: &str, path: &Path) -> Result<(), CopyError> {
        let content = self.fetcher.fetch(key).await?;

        tokio::fs::write(path, &content)
            .await
            .map_err(|source| PathError::Write {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(())
    }
}
