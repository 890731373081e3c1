//! Mutate-then-wait orchestration for regional mode updates.
//!
//! Disabling regional mode makes the remote tear down every regional private
//! endpoint in the background. [`ConvergenceCoordinator`] issues the change and,
//! when the change triggers that teardown, waits for it to settle before the
//! update is reported complete. Reads and imports never go through here.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::client::{RegionalModeClient, RegionalModeSetting, status};
use crate::error::{RemoteError, Result};
use crate::identity::ProjectId;
use crate::poll::{PollExecutor, PollFailure, PollOutcome, PollSpec};

/// Default limit on how long a teardown wait may poll.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60 * 60);

/// Default pause between teardown status queries.
pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_secs(5);

/// Default pause before the first teardown status query.
pub const DEFAULT_INITIAL_DELAY: Duration = Duration::from_secs(3);

/// Timing of the teardown wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitSettings {
    /// Maximum time spent polling.
    pub timeout: Duration,
    /// Fixed pause between polls.
    pub min_interval: Duration,
    /// Pause before the first poll.
    pub initial_delay: Duration,
}

impl Default for WaitSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            min_interval: DEFAULT_MIN_INTERVAL,
            initial_delay: DEFAULT_INITIAL_DELAY,
        }
    }
}

impl WaitSettings {
    /// Builds the spec for waiting on regional endpoint teardown.
    ///
    /// A 404 during this wait means the teardown finished and the remote
    /// dropped the record.
    ///
    /// # Errors
    ///
    /// Returns an error if `timeout` or `min_interval` is zero.
    pub fn teardown_spec(&self) -> Result<PollSpec> {
        PollSpec::builder()
            .pending([status::DELETING])
            .target([status::DELETED, status::IDLE])
            .timeout(self.timeout)
            .min_interval(self.min_interval)
            .initial_delay(self.initial_delay)
            .not_found_as_deleted()
            .build()
    }
}

/// Applies regional mode changes and waits for their side effects to settle.
pub struct ConvergenceCoordinator<C: RegionalModeClient + ?Sized> {
    client: Arc<C>,
    teardown: PollSpec,
    cancel: CancellationToken,
}

impl<C: RegionalModeClient + ?Sized> Clone for ConvergenceCoordinator<C> {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            teardown: self.teardown.clone(),
            cancel: self.cancel.clone(),
        }
    }
}

impl<C: RegionalModeClient + ?Sized> ConvergenceCoordinator<C> {
    /// Creates a coordinator over `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` cannot produce a valid teardown spec.
    pub fn new(client: Arc<C>, settings: WaitSettings) -> Result<Self> {
        Ok(Self {
            client,
            teardown: settings.teardown_spec()?,
            cancel: CancellationToken::new(),
        })
    }

    /// Aborts waits promptly when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Returns the spec used when waiting for teardown.
    #[must_use]
    pub const fn teardown_spec(&self) -> &PollSpec {
        &self.teardown
    }

    /// Returns the client this coordinator mutates through.
    #[must_use]
    pub fn client(&self) -> &Arc<C> {
        &self.client
    }

    /// Returns true if setting regional mode to `enabled` triggers a teardown
    /// that must be waited for.
    #[must_use]
    pub const fn requires_wait(enabled: bool) -> bool {
        !enabled
    }

    /// Sets regional mode on `project`, waiting for teardown when disabling.
    ///
    /// `Succeeded(None)` means the setting was already absent or was observed
    /// as deleted during the wait.
    pub async fn apply(&self, project: &ProjectId, enabled: bool) -> PollOutcome<RegionalModeSetting> {
        let mutate = || self.client.set_regional_mode(project, enabled);

        if !Self::requires_wait(enabled) {
            if self.cancel.is_cancelled() {
                return PollOutcome::Cancelled;
            }
            return match mutate().await {
                Ok(ack) => PollOutcome::Succeeded(Some(ack)),
                Err(err) => PollOutcome::Failed(PollFailure::Remote(err)),
            };
        }

        self.converge(project, mutate, self.teardown.clone()).await
    }

    /// Runs `mutate`, then polls `project` until `spec` is satisfied.
    ///
    /// A 404 from `mutate` means the setting is already gone: the call
    /// succeeds immediately without polling.
    pub async fn converge<M, Fut>(
        &self,
        project: &ProjectId,
        mutate: M,
        spec: PollSpec,
    ) -> PollOutcome<RegionalModeSetting>
    where
        M: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<RegionalModeSetting, RemoteError>>,
    {
        if self.cancel.is_cancelled() {
            return PollOutcome::Cancelled;
        }

        match mutate().await {
            Ok(_) => {}
            Err(err) if err.is_not_found() => {
                tracing::info!(project = %project, "regional mode setting already absent");
                return PollOutcome::Succeeded(None);
            }
            Err(err) => return PollOutcome::Failed(PollFailure::Remote(err)),
        }

        tracing::info!(
            project = %project,
            timeout = ?spec.timeout(),
            "waiting for regional private endpoints to be torn down"
        );

        PollExecutor::new(spec)
            .with_cancellation(self.cancel.clone())
            .execute(|| self.client.get_regional_mode(project))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_match_teardown_expectations() {
        let settings = WaitSettings::default();
        assert_eq!(settings.timeout, Duration::from_secs(3600));
        assert_eq!(settings.min_interval, Duration::from_secs(5));
        assert_eq!(settings.initial_delay, Duration::from_secs(3));
    }

    #[test]
    fn teardown_spec_treats_absence_as_deleted() {
        let spec = WaitSettings::default().teardown_spec().unwrap();
        assert!(spec.pending().contains(status::DELETING));
        assert!(spec.target().contains(status::DELETED));
        assert!(spec.target().contains(status::IDLE));
        assert!(!spec.target().contains(status::FAILED));
        assert_eq!(
            spec.not_found_policy(),
            crate::poll::NotFoundPolicy::AsDeleted
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let settings = WaitSettings {
            min_interval: Duration::ZERO,
            ..WaitSettings::default()
        };
        assert!(settings.teardown_spec().is_err());
    }

    #[test]
    fn only_disabling_requires_a_wait() {
        assert!(ConvergenceCoordinator::<dyn RegionalModeClient>::requires_wait(false));
        assert!(!ConvergenceCoordinator::<dyn RegionalModeClient>::requires_wait(true));
    }
}
