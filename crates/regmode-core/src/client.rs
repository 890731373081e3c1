//! Remote API boundary for the regional mode setting.
//!
//! This module provides:
//!
//! - [`RegionalModeClient`]: Trait implemented by transports (HTTP, test doubles)
//! - [`RegionalModeSetting`]: The setting payload and its teardown status
//!
//! Implementations must tolerate concurrent calls for different projects; the
//! core never coordinates between them.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::RemoteError;
use crate::identity::ProjectId;
use crate::poll::StatusReport;

/// Statuses reported while regional endpoints are torn down.
pub mod status {
    /// Regional endpoints are being removed.
    pub const DELETING: &str = "DELETING";
    /// Regional endpoints have been removed.
    pub const DELETED: &str = "DELETED";
    /// No teardown is in flight.
    pub const IDLE: &str = "IDLE";
    /// Teardown failed on the remote side.
    pub const FAILED: &str = "FAILED";
}

/// The regional private endpoint mode of a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalModeSetting {
    /// Whether private endpoints are created per region.
    pub enabled: bool,
    /// Teardown status, when the remote reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl RegionalModeSetting {
    /// Creates a setting with no teardown in flight.
    #[must_use]
    pub const fn new(enabled: bool) -> Self {
        Self {
            enabled,
            status: None,
        }
    }

    /// Sets the reported teardown status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }
}

impl StatusReport for RegionalModeSetting {
    fn status(&self) -> &str {
        self.status.as_deref().unwrap_or(status::IDLE)
    }
}

/// Read/write capability over a project's regional mode setting.
#[async_trait]
pub trait RegionalModeClient: Send + Sync {
    /// Fetches the current setting.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`]; a 404 means the setting does not exist.
    async fn get_regional_mode(&self, project: &ProjectId) -> Result<RegionalModeSetting, RemoteError>;

    /// Requests a new value for the setting and returns the remote's acknowledgement.
    ///
    /// # Errors
    ///
    /// Returns a [`RemoteError`]; a 404 means the setting does not exist.
    async fn set_regional_mode(
        &self,
        project: &ProjectId,
        enabled: bool,
    ) -> Result<RegionalModeSetting, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_status_reads_as_idle() {
        let setting: RegionalModeSetting = serde_json::from_str(r#"{"enabled":false}"#).unwrap();
        assert_eq!(setting, RegionalModeSetting::new(false));
        assert_eq!(StatusReport::status(&setting), status::IDLE);
    }

    #[test]
    fn explicit_status_is_reported() {
        let setting: RegionalModeSetting =
            serde_json::from_str(r#"{"enabled":false,"status":"DELETING"}"#).unwrap();
        assert_eq!(StatusReport::status(&setting), status::DELETING);
    }

    #[test]
    fn serializes_without_absent_status() {
        let json = serde_json::to_string(&RegionalModeSetting::new(true)).unwrap();
        assert_eq!(json, r#"{"enabled":true}"#);
    }
}
