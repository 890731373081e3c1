//! # regmode-core
//!
//! Lifecycle management for a project's regional private endpoint mode.
//!
//! The setting itself is a boolean. Disabling it makes the remote tear down
//! every regional private endpoint in the background, so an update is only
//! complete once that teardown has settled. This crate provides:
//!
//! - **Identity**: [`CompositeId`] tokens and validated [`ProjectId`]s
//! - **Polling**: [`PollSpec`], the [`classify`](poll::classify) function and [`PollExecutor`]
//! - **Convergence**: [`ConvergenceCoordinator`], which mutates then waits
//! - **Lifecycle**: [`RegionalModeResource`] read, update and import hooks
//! - **Remote boundary**: the [`RegionalModeClient`] trait
//! - **Error Types**: structured [`Error`] values and the [`RemoteError`] taxonomy
//!
//! ## Example
//!
//! ```rust
//! use std::time::Duration;
//! use regmode_core::prelude::*;
//!
//! let spec = PollSpec::builder()
//!     .pending(["DELETING"])
//!     .target(["DELETED"])
//!     .timeout(Duration::from_secs(3600))
//!     .min_interval(Duration::from_secs(5))
//!     .initial_delay(Duration::from_secs(3))
//!     .not_found_as_deleted()
//!     .build()
//!     .unwrap();
//! assert!(spec.pending().contains("DELETING"));
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]

pub mod client;
pub mod converge;
pub mod error;
pub mod identity;
pub mod observability;
pub mod poll;
pub mod resource;

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use regmode_core::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{RegionalModeClient, RegionalModeSetting};
    pub use crate::converge::{ConvergenceCoordinator, WaitSettings};
    pub use crate::error::{Error, Operation, RemoteError, Result};
    pub use crate::identity::{CompositeId, ProjectId};
    pub use crate::poll::{
        NotFoundPolicy, PollExecutor, PollFailure, PollOutcome, PollSpec, RefreshOutcome,
        StatusReport,
    };
    pub use crate::resource::{ImportedState, RegionalModeAttributes, RegionalModeResource};
}

pub use client::{RegionalModeClient, RegionalModeSetting};
pub use converge::{ConvergenceCoordinator, WaitSettings};
pub use error::{Error, Operation, RemoteError, Result};
pub use identity::{CompositeId, ProjectId};
pub use observability::{DEFAULT_FILTER, LogFormat, init_logging};
pub use poll::{PollExecutor, PollOutcome, PollSpec};
pub use resource::{ImportedState, RegionalModeAttributes, RegionalModeResource};
