//! Chainly Store
//!
//! This crate persists workflow definitions. A remote store is preferred; when
//! it cannot be reached, definitions are read from and written to a local
//! durable cache instead.
//!
//! - [`RemoteStore`] is the remote collaborator (see [`HttpWorkflowStore`]).
//! - [`LocalCache`] is a key-free sequence store supporting full reads and
//!   full overwrites (see [`FsCache`] and [`InMemoryCache`]).
//! - [`PersistenceGateway`] ties the two together and reconciles cache writes
//!   by upserting on the workflow id.

mod fs;
mod gateway;
mod memory;
mod remote;

pub use fs::{CACHE_NAMESPACE, FsCache};
pub use gateway::PersistenceGateway;
pub use memory::InMemoryCache;
pub use remote::{HttpWorkflowStore, OfflineStore};

use async_trait::async_trait;
use chainly_remote::RemoteOutcome;
use chainly_workflow::{ValidationError, WorkflowDefinition};

/// Error type for local cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
  /// An I/O error occurred.
  #[error("io error: {0}")]
  Io(#[from] std::io::Error),

  /// The cached data could not be encoded or decoded.
  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

/// Why a save was refused or could not complete.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
  /// The definition breaks the step-chain invariants. Nothing was written.
  #[error("invalid workflow: {0}")]
  Validation(#[from] ValidationError),

  /// The remote was unavailable and the local cache could not be written.
  #[error("local cache write failed: {0}")]
  Cache(#[from] CacheError),
}

/// The remote workflow store.
#[async_trait]
pub trait RemoteStore: Send + Sync {
  /// Fetch every stored workflow.
  async fn list(&self) -> RemoteOutcome<Vec<WorkflowDefinition>>;

  /// Store one workflow and return the stored record.
  async fn create(&self, workflow: &WorkflowDefinition) -> RemoteOutcome<WorkflowDefinition>;
}

/// Local durable cache of workflows.
#[async_trait]
pub trait LocalCache: Send + Sync {
  /// Read the whole cached sequence. An empty cache reads as an empty vec.
  async fn read_all(&self) -> Result<Vec<WorkflowDefinition>, CacheError>;

  /// Replace the whole cached sequence.
  async fn write_all(&self, workflows: &[WorkflowDefinition]) -> Result<(), CacheError>;

  /// Replace the entry with the same id, or append.
  ///
  /// The default is a plain read-modify-write with no guard of its own;
  /// [`PersistenceGateway`] serializes the calls it makes. Caches that may be
  /// shared between gateways override this and guard it themselves.
  async fn upsert(&self, workflow: &WorkflowDefinition) -> Result<(), CacheError> {
    let mut workflows = self.read_all().await?;
    upsert_by_id(&mut workflows, workflow);
    self.write_all(&workflows).await
  }
}

pub(crate) fn upsert_by_id(workflows: &mut Vec<WorkflowDefinition>, workflow: &WorkflowDefinition) {
  match workflows.iter_mut().find(|w| w.id == workflow.id) {
    Some(existing) => *existing = workflow.clone(),
    None => workflows.push(workflow.clone()),
  }
}
