//! Scripted in-memory remote client.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use regmode_core::client::{RegionalModeClient, RegionalModeSetting, status};
use regmode_core::{ProjectId, RemoteError};

/// Scripted response to a single remote call.
pub type Scripted = Result<RegionalModeSetting, RemoteError>;

/// A recorded remote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    /// `get_regional_mode(project)`.
    Get(ProjectId),
    /// `set_regional_mode(project, enabled)`.
    Set(ProjectId, bool),
}

#[derive(Debug, Default)]
struct ScriptState {
    gets: VecDeque<Scripted>,
    project_gets: HashMap<ProjectId, VecDeque<Scripted>>,
    sets: VecDeque<Scripted>,
    calls: Vec<RecordedCall>,
}

/// Remote client that replays queued responses and records every call.
///
/// Status queries for a project with its own script (see
/// [`ScriptedClient::push_gets_for`]) are served from that script first.
/// Calls with no queued response fail with a transport error so an
/// unexpected extra call is visible in the outcome.
#[derive(Debug, Default)]
pub struct ScriptedClient {
    state: Mutex<ScriptState>,
    latency: Duration,
}

impl ScriptedClient {
    /// Creates a client with empty scripts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Delays every call by `latency` (observes the tokio clock).
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Queues a response for the next status query.
    pub fn push_get(&self, response: Scripted) -> &Self {
        self.lock().gets.push_back(response);
        self
    }

    /// Queues several status query responses in order.
    pub fn push_gets(&self, responses: impl IntoIterator<Item = Scripted>) -> &Self {
        self.lock().gets.extend(responses);
        self
    }

    /// Queues status query responses served only to `project`.
    pub fn push_gets_for(
        &self,
        project: &ProjectId,
        responses: impl IntoIterator<Item = Scripted>,
    ) -> &Self {
        self.lock()
            .project_gets
            .entry(project.clone())
            .or_default()
            .extend(responses);
        self
    }

    /// Queues a response for the next mutation.
    pub fn push_set(&self, response: Scripted) -> &Self {
        self.lock().sets.push_back(response);
        self
    }

    /// Returns every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Returns the number of status queries made.
    pub fn get_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Get(_)))
            .count()
    }

    /// Returns the number of status queries made for `project`.
    pub fn get_count_for(&self, project: &ProjectId) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Get(p) if p == project))
            .count()
    }

    /// Returns the number of mutations made.
    pub fn set_count(&self) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|c| matches!(c, RecordedCall::Set(..)))
            .count()
    }

    fn lock(&self) -> MutexGuard<'_, ScriptState> {
        self.state.lock().expect("script state lock poisoned")
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }
}

#[async_trait]
impl RegionalModeClient for ScriptedClient {
    async fn get_regional_mode(&self, project: &ProjectId) -> Result<RegionalModeSetting, RemoteError> {
        let response = {
            let mut state = self.lock();
            state.calls.push(RecordedCall::Get(project.clone()));
            state
                .project_gets
                .get_mut(project)
                .and_then(VecDeque::pop_front)
                .or_else(|| state.gets.pop_front())
        };
        self.simulate_latency().await;
        response.unwrap_or_else(|| Err(RemoteError::transport("no scripted status response")))
    }

    async fn set_regional_mode(
        &self,
        project: &ProjectId,
        enabled: bool,
    ) -> Result<RegionalModeSetting, RemoteError> {
        let response = {
            let mut state = self.lock();
            state.calls.push(RecordedCall::Set(project.clone(), enabled));
            state.sets.pop_front()
        };
        self.simulate_latency().await;
        response.unwrap_or_else(|| Err(RemoteError::transport("no scripted mutation response")))
    }
}

/// Factories for common scripted responses.
pub mod responses {
    use super::{RegionalModeSetting, RemoteError, Scripted, status};

    /// Regional mode disabled, teardown in progress.
    pub fn deleting() -> Scripted {
        Ok(RegionalModeSetting::new(false).with_status(status::DELETING))
    }

    /// Regional mode disabled, teardown finished.
    pub fn deleted() -> Scripted {
        Ok(RegionalModeSetting::new(false).with_status(status::DELETED))
    }

    /// Teardown failed remotely.
    pub fn failed() -> Scripted {
        Ok(RegionalModeSetting::new(false).with_status(status::FAILED))
    }

    /// Setting with no teardown in flight.
    pub fn idle(enabled: bool) -> Scripted {
        Ok(RegionalModeSetting::new(enabled))
    }

    /// The remote no longer knows the setting.
    pub fn not_found() -> Scripted {
        Err(RemoteError::not_found("regional mode setting not found"))
    }

    /// Generic server-side failure.
    pub fn server_error() -> Scripted {
        Err(RemoteError::http(500, "internal server error"))
    }
}
