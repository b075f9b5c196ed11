//! Remote executor backends.

use async_trait::async_trait;
use chainly_remote::{RemoteConfig, RemoteConfigError, RemoteOutcome, fetch_json};
use chainly_workflow::{StepConfig, StepKind};
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::result::ExecutionResult;

/// A backend able to run a step test.
///
/// Implementations report every failure as [`RemoteOutcome::Unavailable`];
/// there is no error channel.
#[async_trait]
pub trait RemoteExecutor: Send + Sync {
  async fn execute(&self, kind: StepKind, config: &StepConfig) -> RemoteOutcome<ExecutionResult>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExecuteRequest<'a> {
  step_type: StepKind,
  config: &'a StepConfig,
}

#[derive(Debug, Deserialize)]
struct ExecuteResponse {
  success: bool,
  message: String,
  #[serde(default)]
  data: Option<ExecuteData>,
}

#[derive(Debug, Deserialize)]
struct ExecuteData {
  #[serde(default)]
  timestamp: Option<DateTime<Utc>>,
}

/// Executor reached over HTTP at `POST {remote}/api/execute`.
pub struct HttpExecutor {
  client: Client,
  endpoint: Url,
}

impl HttpExecutor {
  pub fn new(config: &RemoteConfig) -> Result<Self, RemoteConfigError> {
    let endpoint =
      config
        .endpoint("api/execute")
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
impl RemoteExecutor for HttpExecutor {
  async fn execute(&self, kind: StepKind, config: &StepConfig) -> RemoteOutcome<ExecutionResult> {
    let request = self.client.post(self.endpoint.clone()).json(&ExecuteRequest {
      step_type: kind,
      config,
    });

    match fetch_json::<ExecuteResponse>(request).await {
      RemoteOutcome::Success(response) if response.success => {
        RemoteOutcome::Success(ExecutionResult {
          success: true,
          message: response.message,
          timestamp: response
            .data
            .and_then(|d| d.timestamp)
            .unwrap_or_else(Utc::now),
        })
      }
      RemoteOutcome::Success(response) => RemoteOutcome::Unavailable(format!(
        "remote executor reported failure: {}",
        response.message
      )),
      RemoteOutcome::Unavailable(reason) => RemoteOutcome::Unavailable(reason),
    }
  }
}

/// Executor used when no remote is configured. Always unavailable.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineExecutor;

#[async_trait]
impl RemoteExecutor for OfflineExecutor {
  async fn execute(&self, _kind: StepKind, _config: &StepConfig) -> RemoteOutcome<ExecutionResult> {
    RemoteOutcome::unavailable("no remote executor configured")
  }
}
