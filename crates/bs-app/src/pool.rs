//! Bounded worker pool for blocking solves.

use std::sync::Arc;
use std::time::Duration;

use bs_solver::{CancelToken, SolverFailure};
use tokio::sync::Semaphore;

use crate::error::{AppError, AppResult};

/// At most `workers` jobs run at once; each gets a deadline token.
#[derive(Debug, Clone)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    workers: usize,
    timeout: Duration,
}

impl WorkerPool {
    pub fn new(workers: usize, timeout: Duration) -> Self {
        let workers = workers.max(1);
        Self {
            permits: Arc::new(Semaphore::new(workers)),
            workers,
            timeout,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Permits not currently held by a running job.
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run `job` on the blocking thread pool once a permit is free.
    ///
    /// The deadline starts when the permit is acquired. On expiry the token
    /// is cancelled and a timeout failure is returned; the permit stays held
    /// until the job itself returns.
    pub async fn run<T, F>(&self, job: F) -> AppResult<T>
    where
        F: FnOnce(&CancelToken) -> AppResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| AppError::Internal("worker pool is closed".to_string()))?;

        let cancel = CancelToken::with_timeout(self.timeout);
        let job_cancel = cancel.clone();
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job(&job_cancel)
        });

        match tokio::time::timeout(self.timeout, handle).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(join_error)) => Err(AppError::Internal(format!(
                "worker task failed: {join_error}"
            ))),
            Err(_) => {
                cancel.cancel();
                let diagnostic = serde_json::json!({
                    "cause": "solve exceeded its deadline",
                    "timeout_s": self.timeout.as_secs_f64(),
                })
                .to_string();
                tracing::error!(%diagnostic, "solve timed out; cancellation requested");
                Err(SolverFailure::timed_out(diagnostic).into())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bs_solver::EngineError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn returns_job_output() {
        let pool = WorkerPool::new(2, Duration::from_secs(5));
        let value = pool.run(|_| Ok(41 + 1)).await.unwrap();
        assert_eq!(value, 42);
        assert_eq!(pool.available(), 2);
    }

    #[tokio::test]
    async fn zero_workers_still_runs() {
        let pool = WorkerPool::new(0, Duration::from_secs(5));
        assert_eq!(pool.workers(), 1);
        assert!(pool.run(|_| Ok(())).await.is_ok());
    }

    #[tokio::test]
    async fn expired_job_is_cancelled() {
        let pool = WorkerPool::new(1, Duration::from_millis(50));
        let observed = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&observed);
        let err = pool
            .run(move |cancel| -> AppResult<()> {
                loop {
                    if let Err(cause) = cancel.check() {
                        seen.fetch_add(1, Ordering::SeqCst);
                        assert!(matches!(cause, EngineError::Cancelled | EngineError::TimedOut));
                        return Err(SolverFailure::timed_out(String::new()).into());
                    }
                    std::thread::sleep(Duration::from_millis(5));
                }
            })
            .await
            .unwrap_err();
        assert_eq!(err.status(), 504);

        // The permit comes back once the job observes cancellation.
        let _ = pool.run(|_| Ok(())).await;
        assert_eq!(observed.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_job_is_internal() {
        let pool = WorkerPool::new(1, Duration::from_secs(5));
        let err = pool
            .run(|_| -> AppResult<()> { panic!("boom") })
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(pool.available(), 1);
    }
}
