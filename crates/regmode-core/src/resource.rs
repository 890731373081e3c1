//! Declarative lifecycle of the regional mode setting.
//!
//! [`RegionalModeResource`] exposes the hooks a resource framework calls:
//! read, update and import. Each hook takes explicit inputs and returns an
//! explicit value; nothing is threaded through shared mutable state.
//!
//! # Example
//!
//! ```rust,ignore
//! let resource = RegionalModeResource::new(client, WaitSettings::default())?;
//!
//! let imported = resource.import_state("5f1a2b3c4d5e6f7a8b9c0d1e").await?;
//! let current = resource.read(&imported.id).await?;
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::client::RegionalModeClient;
use crate::converge::{ConvergenceCoordinator, WaitSettings};
use crate::error::{Error, Operation, Result};
use crate::identity::{CompositeId, ProjectId};
use crate::observability::resource_span;

/// Managed attributes of the setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionalModeAttributes {
    /// Project the setting belongs to.
    pub project_id: ProjectId,
    /// Whether regional mode is enabled.
    pub enabled: bool,
}

/// Result of adopting an existing setting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportedState {
    /// Canonical encoded identity to persist.
    pub id: String,
    /// Attributes observed on the remote.
    pub attributes: RegionalModeAttributes,
}

/// Read, update and import hooks for a project's regional mode.
pub struct RegionalModeResource<C: RegionalModeClient + ?Sized> {
    client: Arc<C>,
    coordinator: ConvergenceCoordinator<C>,
}

impl<C: RegionalModeClient + ?Sized> RegionalModeResource<C> {
    /// Creates the resource over `client`.
    ///
    /// # Errors
    ///
    /// Returns an error if `settings` cannot produce a valid teardown wait.
    pub fn new(client: Arc<C>, settings: WaitSettings) -> Result<Self> {
        let coordinator = ConvergenceCoordinator::new(Arc::clone(&client), settings)?;
        Ok(Self {
            client,
            coordinator,
        })
    }

    /// Aborts in-flight waits when `token` is cancelled.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.coordinator = self.coordinator.with_cancellation(token);
        self
    }

    /// Refreshes attributes from the remote.
    ///
    /// Returns `Ok(None)` when the remote reports the setting absent; the
    /// caller should then clear its persisted identity.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid identity token or the remote
    /// call fails for any reason other than absence.
    pub async fn read(&self, id: &str) -> Result<Option<RegionalModeAttributes>> {
        let project = CompositeId::decode(id)?.project_id()?;
        let span = resource_span(Operation::Read, &project);

        async {
            match self.client.get_regional_mode(&project).await {
                Ok(setting) => Ok(Some(RegionalModeAttributes {
                    project_id: project.clone(),
                    enabled: setting.enabled,
                })),
                Err(err) if err.is_not_found() => {
                    tracing::info!("regional mode setting not found, clearing state");
                    Ok(None)
                }
                Err(err) => Err(Error::remote(Operation::Read, &project, err)),
            }
        }
        .instrument(span)
        .await
    }

    /// Applies `enabled` and, when disabling, waits for the regional
    /// endpoints to be torn down.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is invalid, the change is rejected, or the
    /// wait fails, times out or is cancelled.
    pub async fn update(&self, id: &str, enabled: bool) -> Result<RegionalModeAttributes> {
        let project = CompositeId::decode(id)?.project_id()?;
        let span = resource_span(Operation::Update, &project);

        async {
            self.coordinator
                .apply(&project, enabled)
                .await
                .into_result(Operation::Update, &project)?;

            Ok::<_, Error>(RegionalModeAttributes {
                project_id: project.clone(),
                enabled,
            })
        }
        .instrument(span)
        .await
    }

    /// Adopts the setting of an existing project.
    ///
    /// `project_id` is the raw project identifier, not an encoded identity.
    ///
    /// # Errors
    ///
    /// Returns an error if the project ID is invalid or the setting cannot be
    /// fetched, including when it does not exist.
    pub async fn import_state(&self, project_id: &str) -> Result<ImportedState> {
        let project = ProjectId::new(project_id)?;
        let span = resource_span(Operation::Import, &project);

        async {
            let setting = self
                .client
                .get_regional_mode(&project)
                .await
                .map_err(|err| Error::remote(Operation::Import, &project, err))?;

            Ok::<_, Error>(ImportedState {
                id: CompositeId::for_project(&project).encode(),
                attributes: RegionalModeAttributes {
                    project_id: project.clone(),
                    enabled: setting.enabled,
                },
            })
        }
        .instrument(span)
        .await
    }
}
