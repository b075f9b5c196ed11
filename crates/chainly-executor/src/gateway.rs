//! Remote-first step testing with simulated fallback.

use std::sync::Arc;
use std::time::Duration;

use chainly_remote::{DEFAULT_TIMEOUT, RemoteOutcome, with_deadline};
use chainly_workflow::{StepConfig, StepKind};
use tracing::{info, instrument, warn};

use crate::remote::RemoteExecutor;
use crate::result::ExecutionResult;
use crate::simulate::simulate;

/// How long a simulated step test takes, mirroring a real connector round
/// trip.
pub const DEFAULT_SIMULATED_LATENCY: Duration = Duration::from_millis(1500);

/// Dispatches step tests to a remote executor.
///
/// A single remote attempt is made per call. If it fails for any reason the
/// call falls straight through to simulation, which always succeeds.
#[derive(Clone)]
pub struct ExecutorGateway {
  remote: Arc<dyn RemoteExecutor>,
  remote_timeout: Duration,
  simulated_latency: Duration,
}

impl ExecutorGateway {
  pub fn new(remote: Arc<dyn RemoteExecutor>) -> Self {
    Self {
      remote,
      remote_timeout: DEFAULT_TIMEOUT,
      simulated_latency: DEFAULT_SIMULATED_LATENCY,
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

  pub fn with_simulated_latency(mut self, latency: Duration) -> Self {
    self.simulated_latency = latency;
    self
  }

  /// Test one step's behavior.
  #[instrument(name = "test_step", skip_all, fields(kind = %kind))]
  pub async fn test_step(&self, kind: StepKind, config: &StepConfig) -> ExecutionResult {
    let outcome = with_deadline(self.remote_timeout, self.remote.execute(kind, config)).await;

    match outcome {
      RemoteOutcome::Success(result) => {
        info!(message = %result.message, "step tested remotely");
        result
      }
      RemoteOutcome::Unavailable(reason) => {
        warn!(%reason, "remote executor unavailable, simulating");
        let result = simulate(kind, self.simulated_latency).await;
        info!(message = %result.message, "step tested by simulation");
        result
      }
    }
  }
}
