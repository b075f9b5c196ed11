//! Remote workflow store backends.

use async_trait::async_trait;
use chainly_remote::{RemoteConfig, RemoteConfigError, RemoteOutcome, fetch_json};
use chainly_workflow::WorkflowDefinition;
use reqwest::Client;
use url::Url;

use crate::RemoteStore;

/// Store reached over HTTP: `GET` and `POST` on `{remote}/api/zaps`.
pub struct HttpWorkflowStore {
  client: Client,
  endpoint: Url,
}

impl HttpWorkflowStore {
  pub fn new(config: &RemoteConfig) -> Result<Self, RemoteConfigError> {
    let endpoint = config
      .endpoint("api/zaps")
      .map_err(|source| RemoteConfigError::InvalidUrl {
        url: config.base_url().to_string(),
        source,
      })?;

    Ok(Self {
      client: config.build_client()?,
      endpoint,
    })
  }
}

#[async_trait]
impl RemoteStore for HttpWorkflowStore {
  async fn list(&self) -> RemoteOutcome<Vec<WorkflowDefinition>> {
    fetch_json(self.client.get(self.endpoint.clone())).await
  }

  async fn create(&self, workflow: &WorkflowDefinition) -> RemoteOutcome<WorkflowDefinition> {
    fetch_json(self.client.post(self.endpoint.clone()).json(workflow)).await
  }
}

/// Store used when no remote is configured. Always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineStore;

#[async_trait]
impl RemoteStore for OfflineStore {
  async fn list(&self) -> RemoteOutcome<Vec<WorkflowDefinition>> {
    RemoteOutcome::unavailable("no remote store configured")
  }

  async fn create(&self, _workflow: &WorkflowDefinition) -> RemoteOutcome<WorkflowDefinition> {
    RemoteOutcome::unavailable("no remote store configured")
  }
}
