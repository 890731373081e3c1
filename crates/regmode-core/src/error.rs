//! Error types and result aliases for regmode.
//!
//! Errors are structured values: each one carries the operation that failed,
//! the identity of the resource it was operating on and, where there is one,
//! the remote cause. Rendering them into user-facing text is left to callers.

use std::fmt;
use std::time::Duration;

use crate::poll::PollFailure;

/// The result type used throughout regmode.
pub type Result<T> = std::result::Result<T, Error>;

/// The resource operation an error was raised from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Refreshing persisted attributes from the remote setting.
    Read,
    /// Applying a desired setting and waiting for it to settle.
    Update,
    /// Adopting an existing remote setting into managed state.
    Import,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "read",
            Self::Update => "update",
            Self::Import => "import",
        };
        f.write_str(s)
    }
}

/// Failure reported by a remote API client.
///
/// HTTP 404 is the only signal that distinguishes "resource absent" from
/// every other failure; see [`RemoteError::is_not_found`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    /// The remote answered with a non-success HTTP status.
    #[error("remote returned HTTP {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Response body or reason phrase.
        message: String,
    },

    /// The request never produced an HTTP response (connect, TLS, auth setup).
    #[error("transport error: {message}")]
    Transport {
        /// Description of the transport failure.
        message: String,
    },

    /// The response arrived but its payload could not be decoded.
    #[error("malformed response: {message}")]
    Decode {
        /// Description of the decoding failure.
        message: String,
    },
}

impl RemoteError {
    /// HTTP status used by the remote to report an absent resource.
    pub const NOT_FOUND: u16 = 404;

    /// Creates an HTTP status error.
    #[must_use]
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Creates a 404 error.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::http(Self::NOT_FOUND, message)
    }

    /// Creates a transport error.
    #[must_use]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Creates a payload decoding error.
    #[must_use]
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Returns the HTTP status code, if the remote produced one.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Returns true if the remote reported the resource as absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.status(), Some(Self::NOT_FOUND))
    }
}

/// Errors that can occur in regmode operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An invalid identifier was provided.
    #[error("invalid identifier: {message}")]
    InvalidId {
        /// Description of what made the ID invalid.
        message: String,
    },

    /// A poll specification violated its construction rules.
    #[error("invalid poll spec: {message}")]
    InvalidPollSpec {
        /// Description of the violated rule.
        message: String,
    },

    /// A remote call failed.
    #[error("{operation} of regional mode for project {identity} failed: {source}")]
    Remote {
        /// Operation in progress.
        operation: Operation,
        /// Project the operation targeted.
        identity: String,
        /// The remote failure.
        #[source]
        source: RemoteError,
    },

    /// The remote reported a status outside both the pending and target sets.
    #[error(
        "{operation} of regional mode for project {identity} reached unexpected status {status} (expected one of {expected:?})"
    )]
    UnexpectedStatus {
        /// Operation in progress.
        operation: Operation,
        /// Project the operation targeted.
        identity: String,
        /// Status the remote reported.
        status: String,
        /// Pending and target statuses that would have been accepted.
        expected: Vec<String>,
    },

    /// The wait gave up while the remote was still in a pending status.
    #[error("{operation} of regional mode for project {identity} timed out after {elapsed:?}")]
    TimedOut {
        /// Operation in progress.
        operation: Operation,
        /// Project the operation targeted.
        identity: String,
        /// Time spent polling.
        elapsed: Duration,
    },

    /// The caller aborted the wait.
    #[error("{operation} of regional mode for project {identity} was cancelled")]
    Cancelled {
        /// Operation in progress.
        operation: Operation,
        /// Project the operation targeted.
        identity: String,
    },
}

impl Error {
    /// Creates an invalid identifier error.
    #[must_use]
    pub fn invalid_id(message: impl Into<String>) -> Self {
        Self::InvalidId {
            message: message.into(),
        }
    }

    /// Wraps a remote failure with the operation and identity it belongs to.
    #[must_use]
    pub fn remote(operation: Operation, identity: impl fmt::Display, source: RemoteError) -> Self {
        Self::Remote {
            operation,
            identity: identity.to_string(),
            source,
        }
    }

    /// Converts a poll failure into a typed diagnostic.
    #[must_use]
    pub fn from_poll_failure(
        operation: Operation,
        identity: impl fmt::Display,
        failure: PollFailure,
    ) -> Self {
        let identity = identity.to_string();
        match failure {
            PollFailure::Remote(source) => Self::Remote {
                operation,
                identity,
                source,
            },
            PollFailure::UnexpectedStatus { status, expected } => Self::UnexpectedStatus {
                operation,
                identity,
                status,
                expected,
            },
        }
    }

    /// Returns the operation this error was raised from, if any.
    #[must_use]
    pub const fn operation(&self) -> Option<Operation> {
        match self {
            Self::Remote { operation, .. }
            | Self::UnexpectedStatus { operation, .. }
            | Self::TimedOut { operation, .. }
            | Self::Cancelled { operation, .. } => Some(*operation),
            Self::InvalidId { .. } | Self::InvalidPollSpec { .. } => None,
        }
    }

    /// Returns the resource identity this error concerns, if any.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        match self {
            Self::Remote { identity, .. }
            | Self::UnexpectedStatus { identity, .. }
            | Self::TimedOut { identity, .. }
            | Self::Cancelled { identity, .. } => Some(identity),
            Self::InvalidId { .. } | Self::InvalidPollSpec { .. } => None,
        }
    }
}
