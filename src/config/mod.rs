use crate::error::ConfigError;
use crate::utils::uri::StoreUri;
use std::env;
use std::num::NonZeroUsize;
use std::path::PathBuf;
use std::time::Duration;

/// Time budgets for remote calls. There is no budget for local writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    /// Whole listing, across every page (default: 10 s)
    pub list: Duration,

    /// Each object download (default: 50 s)
    pub fetch: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            list: Duration::from_secs(10),
            fetch: Duration::from_secs(50),
        }
    }
}

impl Timeouts {
    /// Load timeouts from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            list: env::var("MIRROR_LIST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.list),

            fetch: env::var("MIRROR_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.fetch),
        }
    }
}

/// Everything one mirror run needs. Built once at the process boundary and
/// handed to the service by value.
#[derive(Debug, Clone)]
pub struct MirrorConfig {
    pub store: StoreUri,
    pub local_root: PathBuf,
    pub concurrency: NonZeroUsize,
    pub timeouts: Timeouts,

    /// Exit non-zero when any single object fails to copy
    pub fail_on_error: bool,
}

impl MirrorConfig {
    /// Zero concurrency is rejected rather than coerced.
    pub fn new(
        store_uri: &str,
        local_root: impl Into<PathBuf>,
        concurrency: usize,
    ) -> Result<Self, ConfigError> {
        let concurrency = NonZeroUsize::new(concurrency).ok_or(ConfigError::ZeroConcurrency)?;

        Ok(Self {
            store: StoreUri::parse(store_uri)?,
            local_root: local_root.into(),
            concurrency,
            timeouts: Timeouts::default(),
            fail_on_error: false,
        })
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    pub fn with_fail_on_error(mut self, fail_on_error: bool) -> Self {
        self.fail_on_error = fail_on_error;
        self
    }
}

/// Connection settings for the S3 API endpoint.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Custom endpoint (MinIO, R2, ...). Falls back to the scheme's default.
    pub endpoint_url: Option<String>,

    /// Region (default: "us-east-1")
    pub region: String,

    /// Static credentials; the AWS environment chain is used when absent
    pub access_key: Option<String>,
    pub secret_key: Option<String>,

    /// Path-style addressing, forced on for custom endpoints
    pub force_path_style: bool,
}

impl StorageConfig {
    /// Load storage settings from environment variables
    pub fn from_env() -> Self {
        Self {
            endpoint_url: env::var("MIRROR_ENDPOINT").ok().filter(|v| !v.is_empty()),
            region: env::var("MIRROR_REGION").unwrap_or_else(|_| "us-east-1".to_string()),
            access_key: env::var("MIRROR_ACCESS_KEY").ok(),
            secret_key: env::var("MIRROR_SECRET_KEY").ok(),
            force_path_style: env::var("MIRROR_FORCE_PATH_STYLE")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = Timeouts::default();
        assert_eq!(timeouts.list, Duration::from_secs(10));
        assert_eq!(timeouts.fetch, Duration::from_secs(50));
    }

    #[test]
    fn test_new_config() {
        let config = MirrorConfig::new("gs://bucket/a/", "/tmp/out", 4).unwrap();
        assert_eq!(config.store.bucket, "bucket");
        assert_eq!(config.store.prefix, "a/");
        assert_eq!(config.local_root, PathBuf::from("/tmp/out"));
        assert_eq!(config.concurrency.get(), 4);
        assert!(!config.fail_on_error);
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let err = MirrorConfig::new("gs://bucket/a/", "/tmp/out", 0).unwrap_err();
        assert!(matches!(err, ConfigError::ZeroConcurrency));
    }

    #[test]
    fn test_builder_overrides() {
        let timeouts = Timeouts {
            list: Duration::from_secs(1),
            fetch: Duration::from_secs(2),
        };
        let config = MirrorConfig::new("s3://b/p", "out", 1)
            .unwrap()
            .with_timeouts(timeouts)
            .with_fail_on_error(true);
        assert_eq!(config.timeouts, timeouts);
        assert!(config.fail_on_error);
    }
}
