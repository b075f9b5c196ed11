//! Runtime settings and gateway wiring.
//!
//! Settings are read from `{data_dir}/config.toml`. A missing or malformed
//! file falls back to defaults; command-line flags override whatever the file
//! says.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chainly_executor::{
  DEFAULT_SIMULATED_LATENCY, ExecutorGateway, HttpExecutor, OfflineExecutor, RemoteExecutor,
};
use chainly_remote::{DEFAULT_TIMEOUT, RemoteConfig};
use chainly_store::{FsCache, HttpWorkflowStore, OfflineStore, PersistenceGateway, RemoteStore};
use serde::Deserialize;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
  /// Base url of the remote store and executor. `None` runs offline.
  pub remote_url: Option<String>,
  pub remote_timeout_ms: u64,
  pub simulated_latency_ms: u64,
}

impl Default for Settings {
  fn default() -> Self {
    Self {
      remote_url: None,
      remote_timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
      simulated_latency_ms: DEFAULT_SIMULATED_LATENCY.as_millis() as u64,
    }
  }
}

impl Settings {
  pub fn remote_timeout(&self) -> Duration {
    Duration::from_millis(self.remote_timeout_ms)
  }

  pub fn simulated_latency(&self) -> Duration {
    Duration::from_millis(self.simulated_latency_ms)
  }
}

/// Load settings from `{data_dir}/config.toml`.
pub async fn load_settings(data_dir: &Path) -> Settings {
  let config_path = data_dir.join("config.toml");

  let content = match tokio::fs::read_to_string(&config_path).await {
    Ok(content) => content,
    Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
      debug!("no config.toml at {}, using defaults", config_path.display());
      return Settings::default();
    }
    Err(err) => {
      warn!("failed to read {}: {err}, using defaults", config_path.display());
      return Settings::default();
    }
  };

  let mut settings = match toml::from_str::<Settings>(&content) {
    Ok(settings) => settings,
    Err(err) => {
      warn!("failed to parse {}: {err}, using defaults", config_path.display());
      return Settings::default();
    }
  };

  if settings.remote_timeout_ms == 0 {
    warn!(
      "remote_timeout_ms must be greater than zero, using {}ms",
      DEFAULT_TIMEOUT.as_millis()
    );
    settings.remote_timeout_ms = DEFAULT_TIMEOUT.as_millis() as u64;
  }

  settings
}

/// The two gateways a command works with.
pub struct Gateways {
  pub executor: ExecutorGateway,
  pub store: PersistenceGateway,
}

/// Build the gateways for the given settings. The local cache lives under
/// `{data_dir}/cache`.
pub fn build_gateways(settings: &Settings, data_dir: &Path) -> Result<Gateways> {
  let (remote_executor, remote_store): (Arc<dyn RemoteExecutor>, Arc<dyn RemoteStore>) =
    match &settings.remote_url {
      Some(url) => {
        let config = RemoteConfig::new(url, settings.remote_timeout())
          .with_context(|| format!("invalid remote configuration for '{}'", url))?;
        info!(remote = %config.base_url(), "using remote collaborators");
        (
          Arc::new(HttpExecutor::new(&config)?),
          Arc::new(HttpWorkflowStore::new(&config)?),
        )
      }
      None => {
        info!("no remote configured, running offline");
        (Arc::new(OfflineExecutor), Arc::new(OfflineStore))
      }
    };

  let cache = FsCache::new(cache_dir(data_dir));

  Ok(Gateways {
    executor: ExecutorGateway::new(remote_executor)
      .with_remote_timeout(settings.remote_timeout())
      .with_simulated_latency(settings.simulated_latency()),
    store: PersistenceGateway::new(remote_store, Arc::new(cache))
      .with_remote_timeout(settings.remote_timeout()),
  })
}

pub fn cache_dir(data_dir: &Path) -> PathBuf {
  data_dir.join("cache")
}
