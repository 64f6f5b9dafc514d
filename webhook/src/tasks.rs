//! Background work that outlives the request that started it.
//!
//! Slack expects slash commands to be acknowledged within a few seconds, so
//! slow work such as generating an answer runs here. Every task has a
//! timeout, can be cancelled on its own, and is cancelled when the service
//! shuts down after a grace period.

use crate::metrics_defs::{BACKGROUND_TASK_OUTCOMES, BACKGROUND_TASKS_INFLIGHT};
use shared::{counter, gauge};
use std::future::Future;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TaskOutcome {
    Completed,
    TimedOut,
    Cancelled,
    Panicked,
}

impl TaskOutcome {
    pub const fn as_str(&self) -> &'static str {
        match self {
            TaskOutcome::Completed => "completed",
            TaskOutcome::TimedOut => "timed_out",
            TaskOutcome::Cancelled => "cancelled",
            TaskOutcome::Panicked => "panicked",
        }
    }
}

/// Handle to a spawned background task.
pub struct TaskHandle {
    name: &'static str,
    token: CancellationToken,
    join: JoinHandle<TaskOutcome>,
}

impl TaskHandle {
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Requests cancellation. The task observes it at its next await point.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Waits for the task to finish.
    pub async fn join(self) -> TaskOutcome {
        match self.join.await {
            Ok(outcome) => outcome,
            Err(err) if err.is_panic() => TaskOutcome::Panicked,
            Err(_) => TaskOutcome::Cancelled,
        }
    }
}

struct InFlightGuard;

impl InFlightGuard {
    fn new() -> Self {
        gauge!(BACKGROUND_TASKS_INFLIGHT).increment(1.0);
        InFlightGuard
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        gauge!(BACKGROUND_TASKS_INFLIGHT).decrement(1.0);
    }
}

/// Runs and tracks background tasks.
#[derive(Clone)]
pub struct BackgroundTasks {
    tracker: TaskTracker,
    shutdown: CancellationToken,
    timeout: Duration,
}

impl BackgroundTasks {
    pub fn new(timeout: Duration) -> Self {
        BackgroundTasks {
            tracker: TaskTracker::new(),
            shutdown: CancellationToken::new(),
            timeout,
        }
    }

    /// Spawns `work` on the runtime.
    ///
    /// The work itself runs in its own tokio task so that a panic is
    /// reported as [`TaskOutcome::Panicked`] instead of tearing down the
    /// supervising future.
    pub fn spawn<F>(&self, name: &'static str, work: F) -> TaskHandle
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = self.shutdown.child_token();
        let cancelled = token.clone();
        let timeout = self.timeout;

        let join = self.tracker.spawn(async move {
            let _in_flight = InFlightGuard::new();
            let mut work = tokio::spawn(work);

            let outcome = tokio::select! {
                biased;
                _ = cancelled.cancelled() => {
                    work.abort();
                    TaskOutcome::Cancelled
                }
                res = tokio::time::timeout(timeout, &mut work) => match res {
                    Ok(Ok(())) => TaskOutcome::Completed,
                    Ok(Err(err)) if err.is_panic() => TaskOutcome::Panicked,
                    Ok(Err(_)) => TaskOutcome::Cancelled,
                    Err(_) => {
                        work.abort();
                        TaskOutcome::TimedOut
                    }
                },
            };

            counter!(BACKGROUND_TASK_OUTCOMES, "task" => name, "outcome" => outcome.as_str())
                .increment(1);
            match outcome {
                TaskOutcome::Completed => tracing::debug!(task = name, "Background task completed"),
                TaskOutcome::Cancelled => tracing::info!(task = name, "Background task cancelled"),
                TaskOutcome::TimedOut => tracing::warn!(
                    task = name,
                    timeout_secs = timeout.as_secs_f64(),
                    "Background task timed out"
                ),
                TaskOutcome::Panicked => tracing::error!(task = name, "Background task panicked"),
            }

            outcome
        });

        TaskHandle { name, token, join }
    }

    /// Number of tasks that have not finished yet.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Waits up to `grace` for running tasks, then cancels whatever is left.
    pub async fn shutdown(&self, grace: Duration) {
        self.tracker.close();

        if tokio::time::timeout(grace, self.tracker.wait()).await.is_err() {
            tracing::warn!(
                remaining = self.in_flight(),
                "Shutdown grace period elapsed, cancelling background tasks"
            );
            self.shutdown.cancel();
            self.tracker.wait().await;
        }

        tracing::info!("Background tasks stopped");
    }
}
