//! Shared test utilities for regmode tests.
//!
//! This crate provides:
//! - [`ScriptedClient`]: In-memory [`RegionalModeClient`] with call recording
//! - Response factories for the statuses a teardown goes through
//! - Custom assertion helpers
//!
//! # Example
//!
//! ```rust,ignore
//! use regmode_test_utils::{ScriptedClient, responses};
//!
//! let client = ScriptedClient::new();
//! client.push_get(responses::deleting());
//! client.push_get(responses::not_found());
//! ```
//!
//! [`RegionalModeClient`]: regmode_core::client::RegionalModeClient

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
// Test utilities use expect/unwrap for cleaner test code - panics are acceptable in tests
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

pub mod assertions;
pub mod client;

pub use assertions::*;
pub use client::*;

/// Project identifier used across tests.
pub const TEST_PROJECT_ID: &str = "5f1a2b3c4d5e6f7a8b9c0d1e";

/// Returns [`TEST_PROJECT_ID`] as a validated project ID.
pub fn test_project() -> regmode_core::ProjectId {
    regmode_core::ProjectId::new(TEST_PROJECT_ID).expect("valid test project id")
}

/// Initialize test logging (call once per test module).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("regmode=debug".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}
