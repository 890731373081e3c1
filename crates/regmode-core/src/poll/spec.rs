//! Poll specification and its builder.

use std::collections::BTreeSet;
use std::time::Duration;

use crate::error::{Error, Result};

/// How a 404 from the status query is interpreted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotFoundPolicy {
    /// Absence is the success signal of a delete-triggered wait.
    AsDeleted,
    /// Absence is a hard error like any other remote failure.
    #[default]
    Fail,
}

/// Immutable description of one convergence wait.
///
/// Built with [`PollSpec::builder`]; the builder enforces that the pending and
/// target sets are disjoint, the target set is non-empty, and both `timeout`
/// and `min_interval` are non-zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSpec {
    pending: BTreeSet<String>,
    target: BTreeSet<String>,
    timeout: Duration,
    min_interval: Duration,
    initial_delay: Duration,
    not_found: NotFoundPolicy,
}

impl PollSpec {
    /// Starts building a spec.
    #[must_use]
    pub fn builder() -> PollSpecBuilder {
        PollSpecBuilder::default()
    }

    /// Statuses that mean "keep polling".
    #[must_use]
    pub fn pending(&self) -> &BTreeSet<String> {
        &self.pending
    }

    /// Statuses that mean "converged".
    #[must_use]
    pub fn target(&self) -> &BTreeSet<String> {
        &self.target
    }

    /// Maximum time spent polling once the initial delay has passed.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fixed pause between consecutive status queries.
    #[must_use]
    pub const fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Pause before the first status query.
    #[must_use]
    pub const fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Interpretation of a 404 status query.
    #[must_use]
    pub const fn not_found_policy(&self) -> NotFoundPolicy {
        self.not_found
    }

    /// Pending followed by target statuses, for diagnostics.
    #[must_use]
    pub fn expected_statuses(&self) -> Vec<String> {
        self.pending.iter().chain(&self.target).cloned().collect()
    }
}

/// Builder for [`PollSpec`].
#[derive(Debug, Clone, Default)]
pub struct PollSpecBuilder {
    pending: BTreeSet<String>,
    target: BTreeSet<String>,
    timeout: Duration,
    min_interval: Duration,
    initial_delay: Duration,
    not_found: NotFoundPolicy,
}

impl PollSpecBuilder {
    /// Adds pending statuses.
    #[must_use]
    pub fn pending<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pending.extend(statuses.into_iter().map(Into::into));
        self
    }

    /// Adds target statuses.
    #[must_use]
    pub fn target<I, S>(mut self, statuses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target.extend(statuses.into_iter().map(Into::into));
        self
    }

    /// Sets the polling timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the fixed interval between polls.
    #[must_use]
    pub const fn min_interval(mut self, interval: Duration) -> Self {
        self.min_interval = interval;
        self
    }

    /// Sets the delay before the first poll.
    #[must_use]
    pub const fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Treats a 404 status query as successful deletion.
    ///
    /// Only delete-triggered waits should opt in.
    #[must_use]
    pub const fn not_found_as_deleted(mut self) -> Self {
        self.not_found = NotFoundPolicy::AsDeleted;
        self
    }

    /// Validates and builds the spec.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPollSpec`] if the status sets overlap, the
    /// target set is empty, or `timeout`/`min_interval` is zero.
    pub fn build(self) -> Result<PollSpec> {
        if self.target.is_empty() {
            return Err(invalid("target status set cannot be empty"));
        }

        if let Some(overlap) = self.pending.intersection(&self.target).next() {
            return Err(invalid(format!(
                "status '{overlap}' is both pending and target"
            )));
        }

        if self.timeout.is_zero() {
            return Err(invalid("timeout must be greater than zero"));
        }

        if self.min_interval.is_zero() {
            return Err(invalid("min interval must be greater than zero"));
        }

        Ok(PollSpec {
            pending: self.pending,
            target: self.target,
            timeout: self.timeout,
            min_interval: self.min_interval,
            initial_delay: self.initial_delay,
            not_found: self.not_found,
        })
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::InvalidPollSpec {
        message: message.into(),
    }
}
