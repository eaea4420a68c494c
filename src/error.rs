use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Invalid run configuration, caught before anything touches the store.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Invalid store URI '{uri}': {reason}")]
    InvalidStoreUri { uri: String, reason: String },

    #[error("Unsupported store scheme '{0}' (expected s3:// or gs://)")]
    UnsupportedScheme(String),
}

/// The prefix enumeration did not run to completion. Always fatal.
#[derive(Error, Debug)]
pub enum ListError {
    #[error("Listing {bucket}/{prefix} timed out after {timeout:?}")]
    Timeout {
        bucket: String,
        prefix: String,
        timeout: Duration,
    },

    #[error("Error listing files in {bucket}/{prefix}: {reason}")]
    Store {
        bucket: String,
        prefix: String,
        reason: String,
    },
}

/// A single object could not be retrieved.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Downloading {key} timed out after {timeout:?}")]
    Timeout { key: String, timeout: Duration },

    #[error("Error downloading file {key}: {reason}")]
    Store { key: String, reason: String },
}

/// A local directory or file could not be created or written.
#[derive(Error, Debug)]
pub enum PathError {
    #[error("Refusing key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("Error creating dirs {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error saving file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Outcome of one failed copy worker.
#[derive(Error, Debug)]
pub enum CopyError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Path(#[from] PathError),
}

/// Run-level failure.
#[derive(Error, Debug)]
pub enum MirrorError {
    #[error(transparent)]
    List(#[from] ListError),

    #[error("{failed} of {listed} objects failed to copy")]
    PartialFailure { listed: usize, failed: usize },
}
