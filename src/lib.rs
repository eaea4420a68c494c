//! Mirror a prefix of a remote object store onto a local directory tree,
//! downloading with a bounded number of concurrent copy tasks.

pub mod config;
pub mod error;
pub mod infrastructure;
pub mod services;
pub mod utils;

pub use config::{MirrorConfig, StorageConfig, Timeouts};
pub use error::{ConfigError, CopyError, FetchError, ListError, MirrorError, PathError};
pub use services::mirror::{MirrorReport, MirrorService};
pub use services::storage::{ObjectStore, S3ObjectStore};
