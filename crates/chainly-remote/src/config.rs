use std::time::Duration;

use url::Url;

/// Remote timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, thiserror::Error)]
pub enum RemoteConfigError {
  #[error("invalid remote url '{url}': {source}")]
  InvalidUrl {
    url: String,
    #[source]
    source: url::ParseError,
  },

  #[error("remote timeout must be greater than zero")]
  ZeroTimeout,

  #[error("failed to build http client: {0}")]
  Client(#[from] reqwest::Error),
}

/// Where a remote collaborator lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteConfig {
  base_url: Url,
  timeout: Duration,
}

impl RemoteConfig {
  /// The timeout must be finite and non-zero: waiting forever is never an
  /// acceptable way to detect an unreachable remote.
  pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteConfigError> {
    if timeout.is_zero() {
      return Err(RemoteConfigError::ZeroTimeout);
    }

    // Endpoints are joined relative to the base, which needs a trailing slash
    // to keep any path prefix.
    let normalized = if base_url.ends_with('/') {
      base_url.to_string()
    } else {
      format!("{}/", base_url)
    };

    let base_url = Url::parse(&normalized).map_err(|source| RemoteConfigError::InvalidUrl {
      url: base_url.to_string(),
      source,
    })?;

    Ok(Self { base_url, timeout })
  }

  pub fn base_url(&self) -> &Url {
    &self.base_url
  }

  pub fn timeout(&self) -> Duration {
    self.timeout
  }

  /// Resolve an API path (e.g. `api/zaps`) against the base url.
  pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
    self.base_url.join(path.trim_start_matches('/'))
  }

  /// Build an HTTP client that gives up after the configured timeout.
  pub fn build_client(&self) -> Result<reqwest::Client, RemoteConfigError> {
    let client = reqwest::Client::builder()
      .timeout(self.timeout)
      .connect_timeout(self.timeout)
      .build()?;
    Ok(client)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_keeps_path_prefix() {
    let config = RemoteConfig::new("http://localhost:3000/chainly", DEFAULT_TIMEOUT).unwrap();
    assert_eq!(
      config.endpoint("/api/zaps").unwrap().as_str(),
      "http://localhost:3000/chainly/api/zaps"
    );
  }

  #[test]
  fn test_endpoint_on_bare_host() {
    let config = RemoteConfig::new("http://localhost:3000", DEFAULT_TIMEOUT).unwrap();
    assert_eq!(
      config.endpoint("api/execute").unwrap().as_str(),
      "http://localhost:3000/api/execute"
    );
  }

  #[test]
  fn test_zero_timeout_rejected() {
    let result = RemoteConfig::new("http://localhost:3000", Duration::ZERO);
    assert!(matches!(result, Err(RemoteConfigError::ZeroTimeout)));
  }

  #[test]
  fn test_invalid_url_rejected() {
    let result = RemoteConfig::new("not a url", DEFAULT_TIMEOUT);
    assert!(matches!(result, Err(RemoteConfigError::InvalidUrl { .. })));
  }
}
