use async_trait::async_trait;
use chainly_workflow::WorkflowDefinition;
use tokio::sync::RwLock;

use crate::{CacheError, LocalCache, upsert_by_id};

/// In-memory cache implementation.
///
/// Suitable for tests and for embedding where durability is not needed.
#[derive(Debug, Default)]
pub struct InMemoryCache {
  workflows: RwLock<Vec<WorkflowDefinition>>,
}

impl InMemoryCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_workflows(workflows: Vec<WorkflowDefinition>) -> Self {
    Self {
      workflows: RwLock::new(workflows),
    }
  }
}

#[async_trait]
impl LocalCache for InMemoryCache {
  async fn read_all(&self) -> Result<Vec<WorkflowDefinition>, CacheError> {
    Ok(self.workflows.read().await.clone())
  }

  async fn write_all(&self, workflows: &[WorkflowDefinition]) -> Result<(), CacheError> {
    *self.workflows.write().await = workflows.to_vec();
    Ok(())
  }

  async fn upsert(&self, workflow: &WorkflowDefinition) -> Result<(), CacheError> {
    upsert_by_id(&mut *self.workflows.write().await, workflow);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chainly_workflow::Step;

  #[tokio::test]
  async fn test_in_memory_cache() {
    let cache = InMemoryCache::new();
    assert!(cache.read_all().await.unwrap().is_empty());

    let workflow = WorkflowDefinition::new("w", vec![Step::trigger("t", "Gmail")]);
    cache.write_all(&[workflow.clone()]).await.unwrap();
    assert_eq!(cache.read_all().await.unwrap(), vec![workflow]);

    cache.write_all(&[]).await.unwrap();
    assert!(cache.read_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_upsert_replaces_by_id() {
    let mut first = WorkflowDefinition::new("A", vec![Step::trigger("t", "Gmail")]);
    first.id = Some("w1".to_string());
    let mut second = first.clone();
    second.name = "B".to_string();

    let cache = InMemoryCache::new();
    cache.upsert(&first).await.unwrap();
    cache.upsert(&second).await.unwrap();

    assert_eq!(cache.read_all().await.unwrap(), vec![second]);
  }
}
