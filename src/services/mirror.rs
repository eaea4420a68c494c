use crate::config::MirrorConfig;
use crate::error::MirrorError;
use crate::services::dispatcher::BoundedDispatcher;
use crate::services::fetcher::ObjectFetcher;
use crate::services::lister::RemoteLister;
use crate::services::storage::ObjectStore;
use crate::services::worker::CopyWorker;
use std::sync::Arc;
use tracing::{info, warn};

/// Per-run counts. Individual failures are only visible here and in the logs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MirrorReport {
    pub listed: usize,
    pub copied: usize,
    pub failed: usize,
}

impl MirrorReport {
    pub fn is_complete(&self) -> bool {
        self.failed == 0
    }
}

/// List a prefix once, then copy every key through the bounded dispatcher.
pub struct MirrorService {
    config: MirrorConfig,
    store: Arc<dyn ObjectStore>,
}

impl MirrorService {
    pub fn new(config: MirrorConfig, store: Arc<dyn ObjectStore>) -> Self {
        Self { config, store }
    }

    /// Listing failures abort before any copy starts. Per-key failures are
    /// counted and, unless `fail_on_error` is set, do not fail the run.
    pub async fn run(&self) -> Result<MirrorReport, MirrorError> {
        let config = &self.config;
        info!("Bucket: {} Path: {}", config.store.bucket, config.store.prefix);

        let keys = RemoteLister::new(self.store.clone(), config.timeouts.list)
            .list(&config.store.prefix)
            .await?;

        let concurrency = config.concurrency.get();
        if concurrency == 1 {
            info!("Single-thread copy");
        } else {
            info!("Multi-thread copy: {}", concurrency);
        }

        let worker = Arc::new(CopyWorker::new(
            ObjectFetcher::new(self.store.clone(), config.timeouts.fetch),
            config.local_root.clone(),
        ));

        let listed = keys.len();
        let summary = BoundedDispatcher::new(config.concurrency)
            .dispatch(keys, |key| {
                let worker = worker.clone();
                async move { worker.run(key).await }
            })
            .await;

        let report = MirrorReport {
            listed,
            copied: summary.succeeded,
            failed: summary.failed,
        };

        if report.is_complete() {
            info!("Finished: {} copied, {} failed", report.copied, report.failed);
        } else {
            warn!("Finished: {} copied, {} failed", report.copied, report.failed);
        }

        if config.fail_on_error && !report.is_complete() {
            return Err(MirrorError::PartialFailure {
                listed: report.listed,
                failed: report.failed,
            });
        }

        Ok(report)
    }
}
