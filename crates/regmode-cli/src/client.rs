//! HTTP client for the Atlas regional mode endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::Serialize;

use regmode_core::client::{RegionalModeClient, RegionalModeSetting};
use regmode_core::{ProjectId, RemoteError};

use crate::Config;

/// Request body for changing the setting.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateRegionalModeRequest {
    enabled: bool,
}

/// API client for the regional private endpoint mode of Atlas projects.
pub struct AtlasClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl AtlasClient {
    /// Creates a new API client from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.api_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
        })
    }

    /// Returns the endpoint URL for `project`.
    #[must_use]
    pub fn regional_mode_url(&self, project: &ProjectId) -> String {
        format!(
            "{}/api/atlas/v1.0/groups/{project}/privateEndpoint/regionalMode",
            self.base_url
        )
    }

    async fn send(&self, request: RequestBuilder) -> Result<RegionalModeSetting, RemoteError> {
        let mut req = request.header(reqwest::header::ACCEPT, "application/json");
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let response = req
            .send()
            .await
            .map_err(|e| RemoteError::transport(format!("failed to send request: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RemoteError::http(status.as_u16(), body));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(format!("failed to read response: {e}")))?;
        serde_json::from_slice(&body)
            .map_err(|e| RemoteError::decode(format!("failed to parse response: {e}")))
    }
}

#[async_trait]
impl RegionalModeClient for AtlasClient {
    async fn get_regional_mode(&self, project: &ProjectId) -> Result<RegionalModeSetting, RemoteError> {
        tracing::debug!(project = %project, "fetching regional mode setting");
        self.send(self.client.get(self.regional_mode_url(project)))
            .await
    }

    async fn set_regional_mode(
        &self,
        project: &ProjectId,
        enabled: bool,
    ) -> Result<RegionalModeSetting, RemoteError> {
        tracing::debug!(project = %project, enabled, "updating regional mode setting");
        let body = UpdateRegionalModeRequest { enabled };
        self.send(self.client.patch(self.regional_mode_url(project)).json(&body))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_strips_trailing_slash() {
        let config = Config {
            api_url: "https://cloud.mongodb.com/".into(),
            ..Config::default()
        };
        let client = AtlasClient::new(&config).unwrap();
        let project = ProjectId::new("5f1a2b3c4d5e6f7a8b9c0d1e").unwrap();
        assert_eq!(
            client.regional_mode_url(&project),
            "https://cloud.mongodb.com/api/atlas/v1.0/groups/5f1a2b3c4d5e6f7a8b9c0d1e/privateEndpoint/regionalMode"
        );
    }

    #[test]
    fn update_request_shape() {
        let json = serde_json::to_string(&UpdateRegionalModeRequest { enabled: false }).unwrap();
        assert_eq!(json, r#"{"enabled":false}"#);
    }
}
