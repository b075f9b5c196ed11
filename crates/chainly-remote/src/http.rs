use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::outcome::RemoteOutcome;

/// Send a request and decode a JSON body.
///
/// Connection failures, timeouts, non-2xx statuses and bodies that do not
/// decode as `T` all resolve to [`RemoteOutcome::Unavailable`].
pub async fn fetch_json<T: DeserializeOwned>(request: RequestBuilder) -> RemoteOutcome<T> {
  let response = match request.send().await {
    Ok(response) => response,
    Err(e) => return RemoteOutcome::Unavailable(format!("request failed: {}", e)),
  };

  let status = response.status();
  if !status.is_success() {
    return RemoteOutcome::Unavailable(format!("remote answered {}", status));
  }

  match response.json::<T>().await {
    Ok(body) => {
      debug!(%status, "remote call succeeded");
      RemoteOutcome::Success(body)
    }
    Err(e) => RemoteOutcome::Unavailable(format!("undecodable response body: {}", e)),
  }
}
