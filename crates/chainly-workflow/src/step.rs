use serde::{Deserialize, Serialize};

/// Connector-owned configuration for a step.
///
/// The core never looks inside; each connector defines its own schema.
pub type StepConfig = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
  /// The condition that starts a workflow. Always the first step.
  Trigger,
  /// Work performed after the trigger fires.
  Action,
}

impl StepKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      StepKind::Trigger => "trigger",
      StepKind::Action => "action",
    }
  }
}

impl std::fmt::Display for StepKind {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

impl std::str::FromStr for StepKind {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.to_ascii_lowercase().as_str() {
      "trigger" => Ok(StepKind::Trigger),
      "action" => Ok(StepKind::Action),
      other => Err(format!("unknown step kind: {}", other)),
    }
  }
}

/// One unit of a workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
  /// Stable identifier, unique within its workflow. Never reassigned.
  pub id: String,

  #[serde(rename = "type")]
  pub kind: StepKind,

  /// Human label, e.g. "Gmail: New Email".
  #[serde(rename = "name")]
  pub display_name: String,

  /// Connector/app label, e.g. "Gmail".
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub app: Option<String>,

  #[serde(default)]
  pub config: StepConfig,
}

impl Step {
  pub fn trigger(id: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self::new(id, StepKind::Trigger, display_name)
  }

  pub fn action(id: impl Into<String>, display_name: impl Into<String>) -> Self {
    Self::new(id, StepKind::Action, display_name)
  }

  fn new(id: impl Into<String>, kind: StepKind, display_name: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      kind,
      display_name: display_name.into(),
      app: None,
      config: StepConfig::new(),
    }
  }
}
