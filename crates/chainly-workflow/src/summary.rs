use serde::Serialize;

use crate::workflow::WorkflowDefinition;

/// What a listing view shows for one workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkflowSummary {
  pub id: Option<String>,
  pub name: String,
  pub step_count: usize,
  pub active: bool,
  pub execution_count: u64,
}

impl From<&WorkflowDefinition> for WorkflowSummary {
  fn from(def: &WorkflowDefinition) -> Self {
    Self {
      id: def.id.clone(),
      name: def.name.clone(),
      step_count: def.steps.len(),
      active: def.active,
      execution_count: def.execution_count,
    }
  }
}

impl std::fmt::Display for WorkflowSummary {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{}  {} ({} steps, {}, {} runs)",
      self.id.as_deref().unwrap_or("-"),
      self.name,
      self.step_count,
      if self.active { "on" } else { "off" },
      self.execution_count
    )
  }
}
