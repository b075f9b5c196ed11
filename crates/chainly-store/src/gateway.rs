//! Remote-first persistence with local cache fallback.

use std::sync::Arc;
use std::time::Duration;

use chainly_remote::{DEFAULT_TIMEOUT, RemoteOutcome, with_deadline};
use chainly_workflow::WorkflowDefinition;
use tokio::sync::Mutex;
use tracing::{info, instrument, warn};

use crate::{CacheError, LocalCache, RemoteStore, SaveError};

/// Reads and writes workflow definitions.
///
/// Clones share the same cache lock, so every clone may be used concurrently.
/// Caches shared between separate gateways must guard their own
/// [`upsert`](LocalCache::upsert), as [`FsCache`](crate::FsCache) and
/// [`InMemoryCache`](crate::InMemoryCache) do.
#[derive(Clone)]
pub struct PersistenceGateway {
  remote: Arc<dyn RemoteStore>,
  cache: Arc<dyn LocalCache>,
  /// Serializes the read-modify-write upsert on the cache.
  cache_lock: Arc<Mutex<()>>,
  remote_timeout: Duration,
}

impl PersistenceGateway {
  pub fn new(remote: Arc<dyn RemoteStore>, cache: Arc<dyn LocalCache>) -> Self {
    Self {
      remote,
      cache,
      cache_lock: Arc::new(Mutex::new(())),
      remote_timeout: DEFAULT_TIMEOUT,
    }
  }

  /// Bound on how long to wait for the remote. A zero timeout keeps the
  /// previous value.
  pub fn with_remote_timeout(mut self, timeout: Duration) -> Self {
    if !timeout.is_zero() {
      self.remote_timeout = timeout;
    }
    self
  }

  /// Load every workflow.
  ///
  /// Whichever source answers is authoritative for this call; remote and
  /// cache are never merged. Never fails: an unreadable cache yields an empty
  /// list.
  #[instrument(name = "load_all", skip_all)]
  pub async fn load_all(&self) -> Vec<WorkflowDefinition> {
    match with_deadline(self.remote_timeout, self.remote.list()).await {
      RemoteOutcome::Success(workflows) => {
        info!(count = workflows.len(), "loaded workflows from remote store");
        workflows
      }
      RemoteOutcome::Unavailable(reason) => {
        warn!(%reason, "remote store unavailable, reading local cache");
        match self.cache.read_all().await {
          Ok(workflows) => {
            info!(count = workflows.len(), "loaded workflows from local cache");
            workflows
          }
          Err(e) => {
            warn!(error = %e, "local cache unreadable");
            Vec::new()
          }
        }
      }
    }
  }

  /// Save a workflow.
  ///
  /// The definition is validated and must carry an id before any I/O
  /// happens. On remote success the stored record is returned; otherwise the
  /// definition is upserted into the local cache by id and returned as-is.
  #[instrument(
    name = "save",
    skip_all,
    fields(workflow_id = definition.id.as_deref().unwrap_or_default())
  )]
  pub async fn save(&self, definition: WorkflowDefinition) -> Result<WorkflowDefinition, SaveError> {
    definition.validate()?;
    let id = definition.require_id()?.to_string();

    match with_deadline(self.remote_timeout, self.remote.create(&definition)).await {
      RemoteOutcome::Success(mut stored) => {
        if stored.id.is_none() {
          stored.id = Some(id);
        }
        info!("saved workflow to remote store");
        Ok(stored)
      }
      RemoteOutcome::Unavailable(reason) => {
        warn!(%reason, "remote store unavailable, saving to local cache");
        self.upsert_cached(&definition).await?;
        info!("saved workflow to local cache");
        Ok(definition)
      }
    }
  }

  async fn upsert_cached(&self, definition: &WorkflowDefinition) -> Result<(), CacheError> {
    let _guard = self.cache_lock.lock().await;
    self.cache.upsert(definition).await
  }
}
