//! Supervised background tasks.
//!
//! Credential rehashes and event alerts are fire-and-forget: their
//! completion is never awaited by the triggering request and their
//! failures must never reach a caller. This registry keeps their join
//! handles so panics are logged instead of vanishing, and so `finalize`
//! can drain outstanding work with a bounded wait instead of abandoning
//! it at shutdown.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Registry for detached background tasks.
#[derive(Clone, Default)]
pub struct BackgroundTasks {
    tasks: Arc<Mutex<Vec<(&'static str, JoinHandle<()>)>>>,
}

impl BackgroundTasks {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn a named task and track its handle.
    ///
    /// The task owns its own error handling; only panics are reported
    /// here. Finished handles are reaped opportunistically so the
    /// registry does not grow with process lifetime.
    pub async fn spawn<F>(&self, name: &'static str, future: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(future);

        let mut finished = Vec::new();
        {
            let mut tasks = self.tasks.lock().await;
            let mut index = 0;
            while index < tasks.len() {
                if tasks[index].1.is_finished() {
                    finished.push(tasks.swap_remove(index));
                } else {
                    index += 1;
                }
            }
            tasks.push((name, handle));
        }

        // Join outside the lock; these handles are already finished, so
        // the awaits return immediately.
        for (task_name, handle) in finished {
            if let Err(err) = handle.await {
                if err.is_panic() {
                    tracing::error!(task = task_name, "background task panicked");
                }
            }
        }
    }

    /// Number of tracked tasks (finished or not).
    pub async fn tracked(&self) -> usize {
        self.tasks.lock().await.len()
    }

    /// Await all outstanding tasks, aborting whatever exceeds the
    /// deadline. Called by the application finalize sequence.
    pub async fn shutdown(&self, deadline: Duration) {
        let drained: Vec<_> = {
            let mut tasks = self.tasks.lock().await;
            tasks.drain(..).collect()
        };

        let deadline_at = tokio::time::Instant::now() + deadline;
        for (name, handle) in drained {
            let remaining = deadline_at.saturating_duration_since(tokio::time::Instant::now());
            let abort = handle.abort_handle();
            match tokio::time::timeout(remaining, handle).await {
                Ok(Ok(())) => {}
                Ok(Err(err)) if err.is_panic() => {
                    tracing::error!(task = name, "background task panicked");
                }
                Ok(Err(_)) => {}
                Err(_) => {
                    abort.abort();
                    tracing::warn!(task = name, "background task aborted at shutdown");
                }
            }
        }
    }
}
