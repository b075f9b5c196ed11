use std::future::Future;
use std::time::Duration;

/// Result of a call to a remote collaborator.
///
/// `Unavailable` covers every transport-level failure (refused connection,
/// timeout, error status, undecodable body). The reason is kept for logging
/// only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome<T> {
  Success(T),
  Unavailable(String),
}

impl<T> RemoteOutcome<T> {
  pub fn unavailable(reason: impl Into<String>) -> Self {
    RemoteOutcome::Unavailable(reason.into())
  }
}

/// Resolve `call` within `timeout`, declaring the remote unavailable when it
/// does not answer in time.
pub async fn with_deadline<T, F>(timeout: Duration, call: F) -> RemoteOutcome<T>
where
  F: Future<Output = RemoteOutcome<T>>,
{
  match tokio::time::timeout(timeout, call).await {
    Ok(outcome) => outcome,
    Err(_) => RemoteOutcome::Unavailable(format!("no answer within {}ms", timeout.as_millis())),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_unavailable_keeps_reason() {
    let outcome: RemoteOutcome<u8> = RemoteOutcome::unavailable("offline");
    assert_eq!(outcome, RemoteOutcome::Unavailable("offline".to_string()));
  }

  #[tokio::test(start_paused = true)]
  async fn test_deadline_declares_unavailable() {
    let outcome: RemoteOutcome<()> = with_deadline(Duration::from_millis(50), async {
      tokio::time::sleep(Duration::from_secs(60)).await;
      RemoteOutcome::Success(())
    })
    .await;

    assert!(matches!(outcome, RemoteOutcome::Unavailable(reason) if reason.contains("50ms")));
  }

  #[tokio::test(start_paused = true)]
  async fn test_deadline_passes_through_fast_answer() {
    let outcome = with_deadline(Duration::from_secs(1), async { RemoteOutcome::Success(7) }).await;
    assert_eq!(outcome, RemoteOutcome::Success(7));
  }
}
