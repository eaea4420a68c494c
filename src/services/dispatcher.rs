use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

/// Tally of one dispatch round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    pub dispatched: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl DispatchSummary {
    fn record<T, E>(&mut self, outcome: Result<Result<T, E>, JoinError>) {
        match outcome {
            Ok(Ok(_)) => self.succeeded += 1,
            Ok(Err(_)) => self.failed += 1,
            Err(e) => {
                error!("Copy task aborted: {}", e);
                self.failed += 1;
            }
        }
    }
}

/// Runs one unit of work per key with at most `budget` units in flight.
///
/// A permit is taken in the dispatch loop *before* the unit is spawned, so a
/// huge key set never turns into a huge number of parked tasks: once the
/// budget is spent the loop itself waits. The permit travels into the task
/// and is released when the task ends, whether it succeeded, failed or
/// panicked.
pub struct BoundedDispatcher {
    budget: NonZeroUsize,
}

impl BoundedDispatcher {
    pub fn new(budget: NonZeroUsize) -> Self {
        Self { budget }
    }

    /// Returns only after every dispatched unit has finished.
    pub async fn dispatch<I, F, Fut, T, E>(&self, keys: I, mut work: F) -> DispatchSummary
    where
        I: IntoIterator<Item = String>,
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, E>> + Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
    {
        let gate = Arc::new(Semaphore::new(self.budget.get()));
        let mut tasks = JoinSet::new();
        let mut summary = DispatchSummary::default();

        for key in keys {
            // The gate is local and never closed.
            let Ok(permit) = gate.clone().acquire_owned().await else {
                error!("Admission gate closed, stopping dispatch");
                break;
            };

            debug!(key = %key, "Dispatching copy task");
            let unit = work(key);
            tasks.spawn(async move {
                let outcome = unit.await;
                drop(permit);
                outcome
            });
            summary.dispatched += 1;

            while let Some(done) = tasks.try_join_next() {
                summary.record(done);
            }
        }

        while let Some(done) = tasks.join_next().await {
            summary.record(done);
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn budget(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    fn keys(count: usize) -> Vec<String> {
        (0..count).map(|i| format!("key-{i}")).collect()
    }

    #[tokio::test]
    async fn test_empty_key_set_completes_immediately() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let summary = BoundedDispatcher::new(budget(3))
            .dispatch(Vec::new(), move |_key| {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<(), ()>(()) }
            })
            .await;

        assert_eq!(summary, DispatchSummary::default());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_active_units_never_exceed_budget() {
        for n in [1, 2, 4] {
            let active = Arc::new(AtomicUsize::new(0));
            let peak = Arc::new(AtomicUsize::new(0));

            let summary = BoundedDispatcher::new(budget(n))
                .dispatch(keys(20), |_key| {
                    let active = active.clone();
                    let peak = peak.clone();
                    async move {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(15)).await;
                        active.fetch_sub(1, Ordering::SeqCst);
                        Ok::<(), ()>(())
                    }
                })
                .await;

            assert_eq!(summary.dispatched, 20);
            assert_eq!(summary.succeeded, 20);
            assert_eq!(active.load(Ordering::SeqCst), 0);
            assert_eq!(peak.load(Ordering::SeqCst), n, "budget {n}");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_units_are_not_launched_past_budget() {
        let n = 3;
        let launched = Arc::new(AtomicUsize::new(0));
        let finished = Arc::new(AtomicUsize::new(0));
        let peak_outstanding = Arc::new(AtomicUsize::new(0));

        let summary = BoundedDispatcher::new(budget(n))
            .dispatch(keys(50), |_key| {
                // Called by the dispatch loop at launch time.
                let outstanding = launched.fetch_add(1, Ordering::SeqCst) + 1
                    - finished.load(Ordering::SeqCst);
                peak_outstanding.fetch_max(outstanding, Ordering::SeqCst);

                let finished = finished.clone();
                async move {
                    tokio::time::sleep(Duration::from_millis(2)).await;
                    finished.fetch_add(1, Ordering::SeqCst);
                    Ok::<(), ()>(())
                }
            })
            .await;

        assert_eq!(summary.dispatched, 50);
        assert_eq!(launched.load(Ordering::SeqCst), 50);
        assert_eq!(finished.load(Ordering::SeqCst), 50);
        assert!(peak_outstanding.load(Ordering::SeqCst) <= n);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_failures_do_not_stop_siblings() {
        let summary = BoundedDispatcher::new(budget(2))
            .dispatch(keys(10), |key| async move {
                if key.ends_with('3') || key.ends_with('7') {
                    Err(format!("{key} failed"))
                } else {
                    Ok(())
                }
            })
            .await;

        assert_eq!(
            summary,
            DispatchSummary {
                dispatched: 10,
                succeeded: 8,
                failed: 2,
            }
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_panicking_unit_releases_its_permit() {
        let dispatcher = BoundedDispatcher::new(budget(1));
        let summary = tokio::time::timeout(
            Duration::from_secs(5),
            dispatcher.dispatch(keys(4), |key| async move {
                if key == "key-0" {
                    panic!("worker blew up");
                }
                Ok::<(), ()>(())
            }),
        )
        .await
        .expect("dispatch deadlocked on a leaked permit");

        assert_eq!(summary.dispatched, 4);
        assert_eq!(summary.succeeded, 3);
        assert_eq!(summary.failed, 1);
    }
}
