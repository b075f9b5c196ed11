use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chainly_workflow::WorkflowDefinition;
use tokio::fs;
use tokio::sync::Mutex;

use crate::{CacheError, LocalCache, upsert_by_id};

/// Logical namespace the workflow cache lives under.
pub const CACHE_NAMESPACE: &str = "workflows";

/// Filesystem-based cache.
///
/// The whole sequence is kept as one JSON array at
/// `{base_path}/workflows.json`. Writes go to a sibling temp file that is then
/// renamed over the target, so a reader sees either the old or the new
/// sequence, never a partial one.
///
/// Writes and upserts through one `FsCache` are serialized, so gateways that
/// share it never lose each other's updates. The guard is in-process only:
/// keep a single `FsCache` per file, and a single process per data dir.
pub struct FsCache {
  path: PathBuf,
  write_lock: Mutex<()>,
}

impl FsCache {
  /// Create a cache rooted at the given directory.
  pub fn new(base_path: impl AsRef<Path>) -> Self {
    Self {
      path: base_path
        .as_ref()
        .join(format!("{}.json", CACHE_NAMESPACE)),
      write_lock: Mutex::new(()),
    }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  fn temp_path(&self) -> PathBuf {
    self
      .path
      .with_extension(format!("json.{}.tmp", uuid::Uuid::new_v4()))
  }

  async fn read_file(&self) -> Result<Vec<WorkflowDefinition>, CacheError> {
    let content = match fs::read_to_string(&self.path).await {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
      Err(e) => return Err(CacheError::Io(e)),
    };

    if content.trim().is_empty() {
      return Ok(Vec::new());
    }

    Ok(serde_json::from_str(&content)?)
  }

  async fn write_file(&self, workflows: &[WorkflowDefinition]) -> Result<(), CacheError> {
    if let Some(parent) = self.path.parent() {
      fs::create_dir_all(parent).await?;
    }

    let data = serde_json::to_vec_pretty(workflows)?;
    let temp = self.temp_path();

    fs::write(&temp, data).await?;
    if let Err(e) = fs::rename(&temp, &self.path).await {
      let _ = fs::remove_file(&temp).await;
      return Err(CacheError::Io(e));
    }

    Ok(())
  }
}

#[async_trait]
impl LocalCache for FsCache {
  async fn read_all(&self) -> Result<Vec<WorkflowDefinition>, CacheError> {
    self.read_file().await
  }

  async fn write_all(&self, workflows: &[WorkflowDefinition]) -> Result<(), CacheError> {
    let _guard = self.write_lock.lock().await;
    self.write_file(workflows).await
  }

  async fn upsert(&self, workflow: &WorkflowDefinition) -> Result<(), CacheError> {
    let _guard = self.write_lock.lock().await;
    let mut workflows = self.read_file().await?;
    upsert_by_id(&mut workflows, workflow);
    self.write_file(&workflows).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use chainly_workflow::Step;

  fn workflow(id: &str, name: &str) -> WorkflowDefinition {
    let mut def = WorkflowDefinition::new(
      name,
      vec![Step::trigger("trigger", "Gmail: New Email"), Step::action("action", "Slack")],
    );
    def.id = Some(id.to_string());
    def
  }

  #[tokio::test]
  async fn test_missing_file_reads_empty() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path().join("cache"));

    assert!(cache.read_all().await.unwrap().is_empty());
  }

  #[tokio::test]
  async fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path().join("cache"));

    let workflows = vec![workflow("w1", "A"), workflow("w2", "B")];
    cache.write_all(&workflows).await.unwrap();

    assert_eq!(cache.read_all().await.unwrap(), workflows);
    assert!(cache.path().ends_with("cache/workflows.json"));
  }

  #[tokio::test]
  async fn test_overwrite_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path());

    cache.write_all(&[workflow("w1", "A")]).await.unwrap();
    cache.write_all(&[workflow("w1", "B")]).await.unwrap();

    let entries: Vec<_> = std::fs::read_dir(dir.path())
      .unwrap()
      .map(|e| e.unwrap().file_name().into_string().unwrap())
      .collect();
    assert_eq!(entries, vec!["workflows.json".to_string()]);

    let cached = cache.read_all().await.unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].name, "B");
  }

  #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
  async fn test_gateways_sharing_cache_keep_every_save() {
    use std::sync::Arc;

    use crate::{OfflineStore, PersistenceGateway};

    let dir = tempfile::tempdir().unwrap();
    let cache = Arc::new(FsCache::new(dir.path()));
    let first = PersistenceGateway::new(Arc::new(OfflineStore), cache.clone());
    let second = PersistenceGateway::new(Arc::new(OfflineStore), cache.clone());

    let handles: Vec<_> = (0..24)
      .map(|i| {
        let gateway = if i % 2 == 0 { first.clone() } else { second.clone() };
        tokio::spawn(async move { gateway.save(workflow(&format!("w{}", i), "A")).await })
      })
      .collect();
    for handle in handles {
      handle.await.unwrap().unwrap();
    }

    let mut ids: Vec<_> = cache
      .read_all()
      .await
      .unwrap()
      .into_iter()
      .filter_map(|w| w.id)
      .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 24);
  }

  #[tokio::test]
  async fn test_corrupt_file_is_serialization_error() {
    let dir = tempfile::tempdir().unwrap();
    let cache = FsCache::new(dir.path());
    std::fs::write(cache.path(), "{ not json").unwrap();

    let result = cache.read_all().await;
    assert!(matches!(result, Err(CacheError::Serialization(_))));
  }
}
