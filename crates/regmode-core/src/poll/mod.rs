//! Poll-until-converged machinery.
//!
//! This module provides:
//!
//! - [`PollSpec`]: Immutable description of a wait (status sets, timing)
//! - [`classify`]: Pure mapping from a remote response to a [`RefreshOutcome`]
//! - [`PollExecutor`]: Bounded, cancellable polling loop producing a [`PollOutcome`]
//!
//! ## State Machine
//!
//! ```text
//! INIT ──(initial delay)──► POLLING ──► SUCCEEDED | FAILED | TIMED_OUT | CANCELLED
//! ```
//!
//! The interval between polls is fixed. Cancellation is observed at the
//! initial delay, at every inter-poll sleep and before every remote call.

mod classify;
mod executor;
mod spec;

pub use classify::classify;
pub use executor::PollExecutor;
pub use spec::{NotFoundPolicy, PollSpec, PollSpecBuilder};

use std::fmt;
use std::time::Duration;

use crate::error::{Error, Operation, RemoteError, Result};

/// A payload that reports the remote status the poller should act on.
pub trait StatusReport {
    /// Returns the status field of the payload.
    fn status(&self) -> &str;
}

/// Why a poll stopped with an error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PollFailure {
    /// The status query failed (transport, auth, decoding or non-404 HTTP).
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// The remote reported a status in neither the pending nor target set.
    #[error("unexpected status {status} (expected one of {expected:?})")]
    UnexpectedStatus {
        /// Status the remote reported.
        status: String,
        /// Statuses that would have been accepted.
        expected: Vec<String>,
    },
}

/// Semantic classification of a single status query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome<T> {
    /// The remote is still converging.
    Ongoing {
        /// Pending status that was reported.
        status: String,
        /// Payload the status was read from.
        payload: T,
    },
    /// The remote reached a target status.
    Terminal {
        /// Target status that was reported.
        status: String,
        /// Payload the status was read from.
        payload: T,
    },
    /// The remote no longer knows the resource, which the wait treats as deleted.
    NotFoundAsDeleted,
    /// The query or its status is a hard error.
    Failure(PollFailure),
}

/// Final result of one [`PollExecutor`] invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome<T> {
    /// The remote converged. `None` means it was observed as deleted.
    Succeeded(Option<T>),
    /// Still pending when the timeout elapsed.
    TimedOut(Duration),
    /// Stopped on a hard error; never retried.
    Failed(PollFailure),
    /// The caller cancelled the wait.
    Cancelled,
}

impl<T> PollOutcome<T> {
    /// Returns true if the wait converged.
    #[must_use]
    pub const fn is_succeeded(&self) -> bool {
        matches!(self, Self::Succeeded(_))
    }

    /// Converts the outcome into a typed result for `operation` on `identity`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimedOut`], [`Error::Cancelled`], or the error matching
    /// the poll failure.
    pub fn into_result(self, operation: Operation, identity: impl fmt::Display) -> Result<Option<T>> {
        match self {
            Self::Succeeded(payload) => Ok(payload),
            Self::TimedOut(elapsed) => Err(Error::TimedOut {
                operation,
                identity: identity.to_string(),
                elapsed,
            }),
            Self::Failed(failure) => Err(Error::from_poll_failure(operation, identity, failure)),
            Self::Cancelled => Err(Error::Cancelled {
                operation,
                identity: identity.to_string(),
            }),
        }
    }
}

/// Bookkeeping gathered during one poll invocation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollReport {
    /// Remote status queries issued.
    pub attempts: u32,
    /// Wall-clock time from entering INIT to the outcome.
    pub elapsed: Duration,
}
