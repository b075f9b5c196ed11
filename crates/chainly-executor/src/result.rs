//! Step test result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of testing one step.
///
/// Remote and simulated executions both produce this shape, so a caller
/// cannot tell them apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionResult {
  pub success: bool,
  pub message: String,
  pub timestamp: DateTime<Utc>,
}
