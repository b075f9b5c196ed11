use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::step::{Step, StepKind};

/// Name given to workflows that were never named.
pub const DEFAULT_WORKFLOW_NAME: &str = "Untitled Zap";

fn default_name() -> String {
  DEFAULT_WORKFLOW_NAME.to_string()
}

fn default_active() -> bool {
  true
}

/// An ordered step chain plus the metadata describing one automation.
///
/// Invariant (checked by [`validate`](Self::validate)): `steps` is non-empty,
/// `steps[0]` is the only trigger, and step ids are unique.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredRecord")]
pub struct WorkflowDefinition {
  /// Assigned before the first save, stable thereafter.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id: Option<String>,

  pub name: String,

  pub steps: Vec<Step>,

  pub active: bool,

  /// Owned by the execution subsystem. Editors never write it.
  pub execution_count: u64,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,

  #[serde(skip_serializing_if = "Option::is_none")]
  pub updated_at: Option<DateTime<Utc>>,
}

/// Record as the store sends it. The store names the id `_id` and the
/// active flag `isActive`, and may send either spelling or both.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
  #[serde(default)]
  id: Option<String>,

  #[serde(default, rename = "_id")]
  store_id: Option<String>,

  #[serde(default = "default_name")]
  name: String,

  #[serde(default)]
  steps: Vec<Step>,

  #[serde(default)]
  active: Option<bool>,

  #[serde(default)]
  is_active: Option<bool>,

  #[serde(default)]
  execution_count: u64,

  #[serde(default)]
  created_at: Option<DateTime<Utc>>,

  #[serde(default)]
  updated_at: Option<DateTime<Utc>>,
}

impl From<StoredRecord> for WorkflowDefinition {
  fn from(record: StoredRecord) -> Self {
    Self {
      id: record.id.or(record.store_id),
      name: record.name,
      steps: record.steps,
      active: record.active.or(record.is_active).unwrap_or_else(default_active),
      execution_count: record.execution_count,
      created_at: record.created_at,
      updated_at: record.updated_at,
    }
  }
}

impl WorkflowDefinition {
  /// Create an unsaved, active definition with the given steps.
  pub fn new(name: impl Into<String>, steps: Vec<Step>) -> Self {
    Self {
      id: None,
      name: name.into(),
      steps,
      active: true,
      execution_count: 0,
      created_at: None,
      updated_at: None,
    }
  }

  /// Check the step-chain invariants.
  pub fn validate(&self) -> Result<(), ValidationError> {
    let first = self.steps.first().ok_or(ValidationError::NoSteps)?;

    if let Some(index) = self
      .steps
      .iter()
      .skip(1)
      .position(|s| s.kind == StepKind::Trigger)
    {
      return Err(ValidationError::MisplacedTrigger { index: index + 1 });
    }

    if first.kind != StepKind::Trigger {
      return Err(ValidationError::MissingTrigger);
    }

    let mut seen = HashSet::new();
    for step in &self.steps {
      if !seen.insert(step.id.as_str()) {
        return Err(ValidationError::DuplicateStepId(step.id.clone()));
      }
    }

    Ok(())
  }

  /// The identifier, or [`ValidationError::MissingId`] if never assigned.
  pub fn require_id(&self) -> Result<&str, ValidationError> {
    match self.id.as_deref() {
      Some(id) if !id.is_empty() => Ok(id),
      _ => Err(ValidationError::MissingId),
    }
  }

  /// Get a step by ID.
  pub fn get_step(&self, step_id: &str) -> Option<&Step> {
    self.steps.iter().find(|s| s.id == step_id)
  }

  pub fn get_step_mut(&mut self, step_id: &str) -> Option<&mut Step> {
    self.steps.iter_mut().find(|s| s.id == step_id)
  }

  pub fn contains_step(&self, step_id: &str) -> bool {
    self.get_step(step_id).is_some()
  }

  /// The leading trigger step, if the chain has one.
  pub fn trigger(&self) -> Option<&Step> {
    self.steps.first().filter(|s| s.kind == StepKind::Trigger)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn two_step() -> WorkflowDefinition {
    WorkflowDefinition::new(
      "Mail to chat",
      vec![
        Step::trigger("trigger", "Gmail: New Email"),
        Step::action("action", "Slack: Send Channel Message"),
      ],
    )
  }

  #[test]
  fn test_valid_chain() {
    assert_eq!(two_step().validate(), Ok(()));
  }

  #[test]
  fn test_trigger_only_chain_is_valid() {
    let def = WorkflowDefinition::new("t", vec![Step::trigger("t", "Webhook")]);
    assert_eq!(def.validate(), Ok(()));
  }

  #[test]
  fn test_empty_chain_rejected() {
    let def = WorkflowDefinition::new("empty", vec![]);
    assert_eq!(def.validate(), Err(ValidationError::NoSteps));
  }

  #[test]
  fn test_leading_action_rejected() {
    let def = WorkflowDefinition::new("no trigger", vec![Step::action("a", "Slack")]);
    assert_eq!(def.validate(), Err(ValidationError::MissingTrigger));
  }

  #[test]
  fn test_trailing_trigger_rejected() {
    let mut def = two_step();
    def.steps.push(Step::trigger("late", "Webhook"));
    assert_eq!(
      def.validate(),
      Err(ValidationError::MisplacedTrigger { index: 2 })
    );
  }

  #[test]
  fn test_trigger_after_action_reports_position() {
    let def = WorkflowDefinition::new(
      "swapped",
      vec![Step::action("a", "Slack"), Step::trigger("t", "Gmail")],
    );
    assert_eq!(
      def.validate(),
      Err(ValidationError::MisplacedTrigger { index: 1 })
    );
  }

  #[test]
  fn test_duplicate_step_ids_rejected() {
    let mut def = two_step();
    def.steps.push(Step::action("action", "Discord"));
    assert_eq!(
      def.validate(),
      Err(ValidationError::DuplicateStepId("action".to_string()))
    );
  }

  #[test]
  fn test_require_id() {
    let mut def = two_step();
    assert_eq!(def.require_id(), Err(ValidationError::MissingId));

    def.id = Some(String::new());
    assert_eq!(def.require_id(), Err(ValidationError::MissingId));

    def.id = Some("w1".to_string());
    assert_eq!(def.require_id(), Ok("w1"));
  }

  #[test]
  fn test_defaults_when_deserializing_sparse_record() {
    let def: WorkflowDefinition = serde_json::from_value(json!({ "id": "w1" })).unwrap();
    assert_eq!(def.name, DEFAULT_WORKFLOW_NAME);
    assert!(def.active);
    assert_eq!(def.execution_count, 0);
    assert!(def.steps.is_empty());
  }

  #[test]
  fn test_accepts_store_record_shape() {
    let def: WorkflowDefinition = serde_json::from_value(json!({
      "_id": "65a1f0",
      "name": "From the store",
      "isActive": false,
      "executionCount": 12,
      "userId": "u1",
      "__v": 0,
      "steps": [
        { "id": "trigger", "type": "trigger", "name": "Gmail: New Email", "config": {} }
      ]
    }))
    .unwrap();

    assert_eq!(def.id.as_deref(), Some("65a1f0"));
    assert!(!def.active);
    assert_eq!(def.execution_count, 12);
    assert_eq!(def.trigger().map(|s| s.id.as_str()), Some("trigger"));
  }

  #[test]
  fn test_accepts_record_with_both_id_spellings() {
    let def: WorkflowDefinition = serde_json::from_value(json!({
      "_id": "65a1f0",
      "id": "w1",
      "name": "A",
      "active": true,
      "isActive": false,
      "steps": [
        { "id": "trigger", "type": "trigger", "name": "Gmail: New Email", "config": {} }
      ]
    }))
    .unwrap();

    assert_eq!(def.id.as_deref(), Some("w1"));
    assert!(def.active);
    assert_eq!(def.steps.len(), 1);
  }

  #[test]
  fn test_serialized_record_reads_back() {
    let mut def = two_step();
    def.id = Some("w1".to_string());
    def.active = false;
    def.created_at = Some(Utc::now());

    let value = serde_json::to_value(&def).unwrap();
    let back: WorkflowDefinition = serde_json::from_value(value).unwrap();
    assert_eq!(back, def);
  }

  #[test]
  fn test_serializes_camel_case() {
    let mut def = two_step();
    def.id = Some("w1".to_string());
    def.execution_count = 3;

    let value = serde_json::to_value(&def).unwrap();
    assert_eq!(value["executionCount"], json!(3));
    assert_eq!(value["active"], json!(true));
    assert!(value.get("createdAt").is_none());
  }
}
