use crate::error::ListError;
use crate::services::storage::ObjectStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::debug;

/// Enumerates the key set of a prefix under a single time budget.
pub struct RemoteLister {
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl RemoteLister {
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Runs the listing to exhaustion. Directory markers (keys ending in `/`)
    /// are dropped since they have no file to write.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>, ListError> {
        let bucket = self.store.bucket().to_string();

        let listing = match timeout(self.timeout, self.store.list_objects(prefix)).await {
            Ok(Ok(keys)) => keys,
            Ok(Err(e)) => {
                return Err(ListError::Store {
                    bucket,
                    prefix: prefix.to_string(),
                    reason: format!("{:#}", e),
                });
            }
            Err(_) => {
                return Err(ListError::Timeout {
                    bucket,
                    prefix: prefix.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        let total = listing.len();
        let keys: Vec<String> = listing
            .into_iter()
            .filter(|key| key.starts_with(prefix) && !key.ends_with('/'))
            .collect();

        debug!(
            bucket = %bucket,
            prefix = %prefix,
            listed = total,
            skipped = total - keys.len(),
            "Listing complete"
        );

        Ok(keys)
    }
}
