//! Workflow editing state machine.

use chainly_executor::{ExecutionResult, ExecutorGateway};
use chainly_store::PersistenceGateway;
use chainly_workflow::{DEFAULT_WORKFLOW_NAME, Step, StepConfig, WorkflowDefinition};
use chrono::Utc;
use tracing::{debug, info, instrument};

use crate::error::BuilderError;

pub const DEFAULT_TRIGGER_NAME: &str = "Gmail: New Email";
pub const DEFAULT_ACTION_NAME: &str = "Slack: Send Channel Message";

/// Label given to freshly added action steps until the user picks a connector.
pub const PLACEHOLDER_STEP_NAME: &str = "Select App & Event";

const TRIGGER_STEP_ID: &str = "trigger";
const ACTION_STEP_ID: &str = "action";

/// One editing session over a workflow definition.
///
/// The definition is owned exclusively by the builder. Readers get either a
/// borrow or an independent [`snapshot`](Self::snapshot); nothing outside can
/// mutate it.
///
/// Invariants held after every call:
/// - the chain is a single leading trigger followed by actions
/// - `selected_step_id`, when set, names a step in the chain
#[derive(Debug)]
pub struct WorkflowBuilder {
  definition: WorkflowDefinition,
  selected_step_id: Option<String>,
  /// Next suffix tried when generating an action step id.
  next_action: u64,
}

impl Default for WorkflowBuilder {
  fn default() -> Self {
    Self::new()
  }
}

impl WorkflowBuilder {
  /// Start a session with a trigger and one action, trigger selected.
  pub fn new() -> Self {
    let mut trigger = Step::trigger(TRIGGER_STEP_ID, DEFAULT_TRIGGER_NAME);
    trigger.app = Some("Gmail".to_string());
    let mut action = Step::action(ACTION_STEP_ID, DEFAULT_ACTION_NAME);
    action.app = Some("Slack".to_string());

    Self {
      definition: WorkflowDefinition::new(DEFAULT_WORKFLOW_NAME, vec![trigger, action]),
      selected_step_id: Some(TRIGGER_STEP_ID.to_string()),
      next_action: 1,
    }
  }

  pub fn name(&self) -> &str {
    &self.definition.name
  }

  pub fn steps(&self) -> &[Step] {
    &self.definition.steps
  }

  pub fn selected_step_id(&self) -> Option<&str> {
    self.selected_step_id.as_deref()
  }

  pub fn selected_step(&self) -> Option<&Step> {
    self
      .selected_step_id
      .as_deref()
      .and_then(|id| self.definition.get_step(id))
  }

  /// Append a new action step and select it.
  pub fn add_action_step(&mut self) -> &Step {
    let id = self.fresh_action_id();
    debug!(step_id = %id, "adding action step");

    self
      .definition
      .steps
      .push(Step::action(id.clone(), PLACEHOLDER_STEP_NAME));
    self.selected_step_id = Some(id);

    let last = self.definition.steps.len() - 1;
    &self.definition.steps[last]
  }

  /// Select a step. On failure the current selection is left untouched.
  pub fn select_step(&mut self, step_id: &str) -> Result<(), BuilderError> {
    if !self.definition.contains_step(step_id) {
      return Err(BuilderError::StepNotFound(step_id.to_string()));
    }

    self.selected_step_id = Some(step_id.to_string());
    Ok(())
  }

  /// Rename the selected step. Does nothing when no step is selected.
  pub fn rename_selected_step(&mut self, new_name: impl Into<String>) {
    if let Some(step) = self.selected_step_mut() {
      step.display_name = new_name.into();
    }
  }

  /// Replace the selected step's config. Does nothing when no step is
  /// selected.
  pub fn set_selected_config(&mut self, config: StepConfig) {
    if let Some(step) = self.selected_step_mut() {
      step.config = config;
    }
  }

  pub fn rename_workflow(&mut self, name: impl Into<String>) {
    self.definition.name = name.into();
  }

  /// An independent copy of the definition as it stands.
  pub fn snapshot(&self) -> WorkflowDefinition {
    self.definition.clone()
  }

  /// Test the selected step against the executor.
  pub async fn test_selected_step(
    &self,
    executor: &ExecutorGateway,
  ) -> Result<ExecutionResult, BuilderError> {
    let step = self.selected_step().ok_or(BuilderError::NoSelection)?;
    Ok(executor.test_step(step.kind, &step.config).await)
  }

  /// Publish the workflow, ending the session.
  ///
  /// Assigns a client-side id when the definition has none, stamps the
  /// timestamps and marks the workflow active before saving.
  #[instrument(name = "publish", skip_all, fields(steps = self.definition.steps.len()))]
  pub async fn publish(
    self,
    store: &PersistenceGateway,
  ) -> Result<WorkflowDefinition, BuilderError> {
    let mut definition = self.definition;
    let now = Utc::now();

    let id = definition
      .id
      .get_or_insert_with(|| uuid::Uuid::new_v4().to_string())
      .clone();
    definition.created_at.get_or_insert(now);
    definition.updated_at = Some(now);
    definition.active = true;

    let saved = store.save(definition).await?;
    info!(workflow_id = %id, "workflow published");
    Ok(saved)
  }

  fn selected_step_mut(&mut self) -> Option<&mut Step> {
    let id = self.selected_step_id.as_deref()?;
    self.definition.get_step_mut(id)
  }

  fn fresh_action_id(&mut self) -> String {
    loop {
      let id = format!("{}-{}", ACTION_STEP_ID, self.next_action);
      self.next_action += 1;
      if !self.definition.contains_step(&id) {
        return id;
      }
    }
  }
}
