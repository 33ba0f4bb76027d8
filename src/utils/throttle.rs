//! Bounded-concurrency, rate-paced job scheduler for outbound API calls.
//!
//! Third-party shortening services rate-limit aggressively, so bulk copies
//! go through a [`RequestThrottle`]: at most `concurrency` jobs are active
//! at once, and consecutive dispatches are at least `request_delay` apart.
//! Jobs are dispatched in enqueue order; completion order depends on the
//! jobs themselves.
//!
//! One throttle is created per long-lived process and shared by cloning
//! the handle. Queued jobs live only in memory and are lost on restart.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use tokio::sync::{Mutex as AsyncMutex, OwnedSemaphorePermit, Semaphore, oneshot};
use tracing::debug;

/// Callback invoked once per completed job.
pub type ProgressCallback = Arc<dyn Fn(ThrottleProgress) + Send + Sync>;

/// Errors returned by [`RequestThrottle::schedule`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThrottleError {
    /// The job panicked or was dropped before producing a result.
    #[error("Throttled job was dropped before completing")]
    Dropped,
}

/// Throttle limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThrottleConfig {
    /// Maximum number of jobs active at once.
    pub concurrency: usize,
    /// Minimum spacing between two dispatches.
    pub request_delay: Duration,
    /// Pause after a completion before its slot is handed on.
    pub yield_delay: Duration,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            concurrency: 3,
            request_delay: Duration::from_millis(200),
            yield_delay: Duration::from_millis(10),
        }
    }
}

/// Snapshot of throttle counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThrottleProgress {
    pub completed: usize,
    pub active: usize,
    pub pending: usize,
}

struct Inner {
    config: ThrottleConfig,
    /// One permit per active job. Waiters are served in FIFO order.
    slots: Arc<Semaphore>,
    /// Held while a job waits for its slot and its pacing cell, so jobs
    /// leave the queue strictly in enqueue order.
    dispatch_gate: AsyncMutex<()>,
    /// `None` when `request_delay` is zero.
    pacer: Option<DefaultDirectRateLimiter>,
    pending: AtomicUsize,
    active: AtomicUsize,
    completed: AtomicUsize,
    progress: Mutex<Option<ProgressCallback>>,
}

/// Shared handle to a FIFO job throttle.
///
/// Concurrency is bounded by a [`Semaphore`]; dispatch spacing comes from a
/// single-cell `governor` quota of one job per `request_delay`.
///
/// # Examples
///
/// ```ignore
/// let throttle = RequestThrottle::new(ThrottleConfig::default());
/// let short = throttle
///     .schedule(move || async move { client.shorten(&url, provider).await })
///     .await??;
/// ```
#[derive(Clone)]
pub struct RequestThrottle {
    inner: Arc<Inner>,
}

impl RequestThrottle {
    /// Creates a throttle. A concurrency of zero is treated as one.
    pub fn new(config: ThrottleConfig) -> Self {
        let config = ThrottleConfig {
            concurrency: config.concurrency.max(1),
            ..config
        };

        let pacer = Quota::with_period(config.request_delay).map(RateLimiter::direct);

        Self {
            inner: Arc::new(Inner {
                config,
                slots: Arc::new(Semaphore::new(config.concurrency)),
                dispatch_gate: AsyncMutex::new(()),
                pacer,
                pending: AtomicUsize::new(0),
                active: AtomicUsize::new(0),
                completed: AtomicUsize::new(0),
                progress: Mutex::new(None),
            }),
        }
    }

    pub fn config(&self) -> ThrottleConfig {
        self.inner.config
    }

    /// Enqueues `job` and resolves with its output once it has run.
    ///
    /// The job's own errors are part of `T`; the throttle only fails when
    /// the job never produced a value. A dispatched job runs to completion
    /// even if the caller stops waiting.
    ///
    /// # Errors
    ///
    /// Returns [`ThrottleError::Dropped`] if the job panicked.
    pub async fn schedule<F, Fut, T>(&self, job: F) -> Result<T, ThrottleError>
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let inner = Arc::clone(&self.inner);
        inner.pending.fetch_add(1, Ordering::SeqCst);

        tokio::spawn(async move {
            let Some(slot) = inner.acquire_dispatch_slot().await else {
                inner.pending.fetch_sub(1, Ordering::SeqCst);
                return;
            };
            inner.pending.fetch_sub(1, Ordering::SeqCst);
            inner.active.fetch_add(1, Ordering::SeqCst);

            metrics::counter!("throttle_jobs_dispatched_total").increment(1);
            debug!("Throttle dispatching job");

            // A panicking job surfaces as a JoinError; the slot is still ours.
            let output = tokio::spawn(async move { job().await }).await;

            inner.active.fetch_sub(1, Ordering::SeqCst);
            inner.completed.fetch_add(1, Ordering::SeqCst);
            inner.report_progress();

            if let Ok(output) = output {
                let _ = tx.send(output);
            }

            tokio::time::sleep(inner.config.yield_delay).await;
            drop(slot);
        });

        rx.await.map_err(|_| ThrottleError::Dropped)
    }

    /// Registers the single progress callback, replacing any previous one.
    ///
    /// Callers must clear it with [`Self::clear_progress_callback`] once
    /// their bulk operation is done.
    pub fn set_progress_callback<F>(&self, callback: F)
    where
        F: Fn(ThrottleProgress) + Send + Sync + 'static,
    {
        *self.inner.lock_progress() = Some(Arc::new(callback));
    }

    pub fn clear_progress_callback(&self) {
        *self.inner.lock_progress() = None;
    }

    /// Current counters.
    pub fn progress(&self) -> ThrottleProgress {
        self.inner.snapshot()
    }
}

impl Default for RequestThrottle {
    fn default() -> Self {
        Self::new(ThrottleConfig::default())
    }
}

impl Inner {
    fn lock_progress(&self) -> MutexGuard<'_, Option<ProgressCallback>> {
        self.progress.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> ThrottleProgress {
        ThrottleProgress {
            completed: self.completed.load(Ordering::SeqCst),
            active: self.active.load(Ordering::SeqCst),
            pending: self.pending.load(Ordering::SeqCst),
        }
    }

    /// Waits for a free slot, then for the next pacing cell.
    ///
    /// Returns `None` only if the semaphore was closed.
    async fn acquire_dispatch_slot(&self) -> Option<OwnedSemaphorePermit> {
        let _gate = self.dispatch_gate.lock().await;
        let slot = Arc::clone(&self.slots).acquire_owned().await.ok()?;

        if let Some(pacer) = &self.pacer {
            pacer.until_ready().await;
        }

        Some(slot)
    }

    fn report_progress(&self) {
        let callback = self.lock_progress().clone();
        if let Some(callback) = callback {
            callback(self.snapshot());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future::join_all;
    use std::time::Instant;

    /// Short delays so the pacing runs on the real clock.
    fn throttle() -> RequestThrottle {
        RequestThrottle::new(ThrottleConfig {
            concurrency: 3,
            request_delay: Duration::from_millis(50),
            yield_delay: Duration::from_millis(5),
        })
    }

    #[test]
    fn test_default_limits() {
        let config = ThrottleConfig::default();
        assert_eq!(config.concurrency, 3);
        assert_eq!(config.request_delay, Duration::from_millis(200));
        assert_eq!(config.yield_delay, Duration::from_millis(10));
    }

    #[tokio::test]
    async fn test_never_exceeds_concurrency_limit() {
        let throttle = RequestThrottle::new(ThrottleConfig {
            concurrency: 3,
            request_delay: Duration::ZERO,
            yield_delay: Duration::ZERO,
        });
        let in_flight = Arc::new(AtomicUsize::new(0));
        let max_seen = Arc::new(AtomicUsize::new(0));

        let jobs = (0..10).map(|_| {
            let in_flight = in_flight.clone();
            let max_seen = max_seen.clone();
            throttle.schedule(move || async move {
                let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                max_seen.fetch_max(now, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(40)).await;
                in_flight.fetch_sub(1, Ordering::SeqCst);
            })
        });

        let results = join_all(jobs).await;

        assert!(results.iter().all(Result::is_ok));
        assert_eq!(max_seen.load(Ordering::SeqCst), 3);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        assert_eq!(throttle.progress().completed, 10);
    }

    #[tokio::test]
    async fn test_dispatches_are_spaced_and_ordered() {
        let throttle = throttle();
        let starts = Arc::new(Mutex::new(Vec::new()));

        let jobs = (0..6).map(|i| {
            let starts = starts.clone();
            throttle.schedule(move || async move {
                starts.lock().unwrap().push((i, Instant::now()));
                tokio::time::sleep(Duration::from_millis(10)).await;
            })
        });
        join_all(jobs).await;

        let starts = starts.lock().unwrap().clone();
        assert_eq!(starts.len(), 6);

        let order: Vec<_> = starts.iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![0, 1, 2, 3, 4, 5]);

        // Timestamps are taken inside the job, a little after dispatch.
        for pair in starts.windows(2) {
            let gap = pair[1].1 - pair[0].1;
            assert!(gap >= Duration::from_millis(45), "gap was {gap:?}");
        }
    }

    #[tokio::test]
    async fn test_returns_job_output_and_errors() {
        let throttle = throttle();

        let ok = throttle.schedule(|| async { Ok::<_, String>(7) }).await;
        assert_eq!(ok, Ok(Ok(7)));

        let err = throttle
            .schedule(|| async { Err::<u32, _>("boom".to_string()) })
            .await;
        assert_eq!(err, Ok(Err("boom".to_string())));
    }

    #[tokio::test]
    async fn test_panicking_job_reports_dropped_and_frees_slot() {
        let throttle = RequestThrottle::new(ThrottleConfig {
            concurrency: 1,
            ..ThrottleConfig::default()
        });

        let failed: Result<(), ThrottleError> =
            throttle.schedule(|| async { panic!("job exploded") }).await;
        assert_eq!(failed, Err(ThrottleError::Dropped));

        let next = throttle.schedule(|| async { 1 }).await;
        assert_eq!(next, Ok(1));
        assert_eq!(throttle.progress().active, 0);
    }

    #[tokio::test]
    async fn test_progress_callback_until_cleared() {
        let throttle = throttle();
        let calls = Arc::new(AtomicUsize::new(0));

        let counter = calls.clone();
        throttle.set_progress_callback(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        join_all((0..4).map(|_| throttle.schedule(|| async {}))).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        throttle.clear_progress_callback();
        throttle.schedule(|| async {}).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(throttle.progress().completed, 5);
    }

    #[tokio::test]
    async fn test_pending_counts_queued_jobs() {
        let throttle = RequestThrottle::new(ThrottleConfig {
            concurrency: 1,
            request_delay: Duration::ZERO,
            yield_delay: Duration::ZERO,
        });
        let (release_tx, release_rx) = oneshot::channel::<()>();

        let first = tokio::spawn({
            let throttle = throttle.clone();
            async move {
                throttle
                    .schedule(move || async move {
                        let _ = release_rx.await;
                    })
                    .await
            }
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
        let second = tokio::spawn({
            let throttle = throttle.clone();
            async move { throttle.schedule(|| async {}).await }
        });

        tokio::time::sleep(Duration::from_millis(20)).await;
        let snapshot = throttle.progress();
        assert_eq!(snapshot.active, 1);
        assert_eq!(snapshot.pending, 1);

        release_tx.send(()).unwrap();
        first.await.unwrap().unwrap();
        second.await.unwrap().unwrap();
        assert_eq!(throttle.progress().pending, 0);
    }

    #[test]
    fn test_zero_concurrency_is_clamped() {
        let throttle = RequestThrottle::new(ThrottleConfig {
            concurrency: 0,
            ..ThrottleConfig::default()
        });
        assert_eq!(throttle.config().concurrency, 1);
    }
}
