use std::time::Duration;

use chainly_workflow::StepKind;
use chrono::Utc;

use crate::result::ExecutionResult;

/// Canned message reported by the simulated executor.
pub fn simulated_message(kind: StepKind) -> &'static str {
  match kind {
    StepKind::Trigger => "Simulation: Found 3 new emails!",
    StepKind::Action => "Simulation: Successfully sent message to #general",
  }
}

/// Produce a successful result after `latency`, standing in for a real
/// connector round trip.
pub(crate) async fn simulate(kind: StepKind, latency: Duration) -> ExecutionResult {
  tokio::time::sleep(latency).await;

  ExecutionResult {
    success: true,
    message: simulated_message(kind).to_string(),
    timestamp: Utc::now(),
  }
}
