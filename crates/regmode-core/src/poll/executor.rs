//! Bounded, cancellable polling loop.

use std::future::Future;

use tokio::time::{Instant, sleep, sleep_until};
use tokio_util::sync::CancellationToken;

use crate::error::RemoteError;

use super::{PollOutcome, PollReport, PollSpec, RefreshOutcome, StatusReport, classify};

/// Drives one wait described by a [`PollSpec`] to a single [`PollOutcome`].
///
/// The executor runs on the caller's task and holds no shared state. Every
/// suspension point (the initial delay, each inter-poll sleep and each
/// in-flight status query) is raced against the cancellation token; once
/// cancellation is observed no further status query is issued.
///
/// # Example
///
/// ```rust,ignore
/// let outcome = PollExecutor::new(spec)
///     .with_cancellation(token)
///     .execute(|| client.get_regional_mode(&project))
///     .await;
/// ```
#[derive(Debug)]
pub struct PollExecutor {
    spec: PollSpec,
    cancel: CancellationToken,
}

impl PollExecutor {
    /// Creates an executor that can only finish by converging, failing or timing out.
    #[must_use]
    pub fn new(spec: PollSpec) -> Self {
        Self {
            spec,
            cancel: CancellationToken::new(),
        }
    }

    /// Makes the wait abort promptly when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns the spec this executor runs.
    #[must_use]
    pub fn spec(&self) -> &PollSpec {
        &self.spec
    }

    /// Polls `refresh` until the remote converges, fails, times out or the
    /// wait is cancelled.
    pub async fn execute<T, F, Fut>(self, refresh: F) -> PollOutcome<T>
    where
        T: StatusReport,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        self.execute_with_report(refresh).await.0
    }

    /// Like [`PollExecutor::execute`], also returning attempt and timing bookkeeping.
    pub async fn execute_with_report<T, F, Fut>(self, mut refresh: F) -> (PollOutcome<T>, PollReport)
    where
        T: StatusReport,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let entered = Instant::now();
        let mut report = PollReport::default();
        let outcome = self.run(&mut refresh, &mut report).await;
        report.elapsed = entered.elapsed();

        match &outcome {
            PollOutcome::Succeeded(_) => tracing::info!(
                attempts = report.attempts,
                elapsed = ?report.elapsed,
                "poll converged"
            ),
            PollOutcome::TimedOut(elapsed) => tracing::warn!(
                attempts = report.attempts,
                elapsed = ?elapsed,
                "poll timed out while still pending"
            ),
            PollOutcome::Failed(failure) => tracing::warn!(
                attempts = report.attempts,
                error = %failure,
                "poll failed"
            ),
            PollOutcome::Cancelled => tracing::info!(attempts = report.attempts, "poll cancelled"),
        }

        (outcome, report)
    }

    async fn run<T, F, Fut>(&self, refresh: &mut F, report: &mut PollReport) -> PollOutcome<T>
    where
        T: StatusReport,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let delay = self.spec.initial_delay();
        if !delay.is_zero() {
            tokio::select! {
                biased;
                () = self.cancel.cancelled() => return PollOutcome::Cancelled,
                () = sleep(delay) => {}
            }
        }

        let timeout = self.spec.timeout();
        let start = Instant::now();
        let deadline = start + timeout;

        loop {
            if self.cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }

            report.attempts += 1;
            // A query still in flight at the deadline counts as pending.
            let response = tokio::select! {
                biased;
                () = self.cancel.cancelled() => return PollOutcome::Cancelled,
                response = refresh() => response,
                () = sleep_until(deadline) => return PollOutcome::TimedOut(start.elapsed()),
            };

            match classify(&self.spec, response) {
                RefreshOutcome::NotFoundAsDeleted => {
                    tracing::debug!(attempt = report.attempts, "resource absent, treating as deleted");
                    return PollOutcome::Succeeded(None);
                }
                RefreshOutcome::Terminal { status, payload } => {
                    tracing::debug!(attempt = report.attempts, %status, "target status reached");
                    return PollOutcome::Succeeded(Some(payload));
                }
                RefreshOutcome::Failure(failure) => return PollOutcome::Failed(failure),
                RefreshOutcome::Ongoing { status, .. } => {
                    let elapsed = start.elapsed();
                    tracing::debug!(
                        attempt = report.attempts,
                        %status,
                        elapsed = ?elapsed,
                        "still pending"
                    );
                    if elapsed >= timeout {
                        return PollOutcome::TimedOut(elapsed);
                    }

                    let pause = self.spec.min_interval().min(timeout - elapsed);
                    tokio::select! {
                        biased;
                        () = self.cancel.cancelled() => return PollOutcome::Cancelled,
                        () = sleep(pause) => {}
                    }
                }
            }
        }
    }
}
