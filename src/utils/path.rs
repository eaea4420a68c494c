use crate::error::PathError;
use std::path::{Path, PathBuf};

/// Maps a remote key onto the local tree: `root + "/" + key`, with the key's
/// `/` separators kept as path separators.
pub fn target_path(root: &Path, key: &str) -> Result<PathBuf, PathError> {
    let refuse = |reason: &'static str| PathError::InvalidKey {
        key: key.to_string(),
        reason,
    };

    if key.is_empty() {
        return Err(refuse("empty key"));
    }
    if key.starts_with('/') {
        return Err(refuse("absolute key"));
    }
    if key.split('/').any(|segment| segment == "..") {
        return Err(refuse("key escapes the local root"));
    }

    Ok(root.join(key))
}

/// Computes the target path for `key` and creates every missing ancestor
/// directory.
pub async fn ensure_target(root: &Path, key: &str) -> Result<PathBuf, PathError> {
    let path = target_path(root, key)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| PathError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    Ok(path)
}
