use crate::error::FetchError;
use crate::services::storage::ObjectStore;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

/// Downloads whole objects into memory, one time budget per call.
#[derive(Clone)]
pub struct ObjectFetcher {
    store: Arc<dyn ObjectStore>,
    timeout: Duration,
}

impl ObjectFetcher {
    pub fn new(store: Arc<dyn ObjectStore>, timeout: Duration) -> Self {
        Self { store, timeout }
    }

    /// Either the complete content or an error; nothing partial escapes.
    pub async fn fetch(&self, key: &str) -> Result<Bytes, FetchError> {
        let data = match timeout(self.timeout, self.store.get_file(key)).await {
            Ok(Ok(data)) => data,
            Ok(Err(e)) => {
                return Err(FetchError::Store {
                    key: key.to_string(),
                    reason: format!("{:#}", e),
                });
            }
            Err(_) => {
                return Err(FetchError::Timeout {
                    key: key.to_string(),
                    timeout: self.timeout,
                });
            }
        };

        info!(key = %key, bytes = data.len(), "Object {} downloaded", key);
        Ok(data)
    }
}
