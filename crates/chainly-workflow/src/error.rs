use thiserror::Error;

/// A workflow definition that breaks the step-chain invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("workflow has no steps")]
  NoSteps,

  #[error("workflow has no trigger step")]
  MissingTrigger,

  #[error("trigger step at position {index}, triggers may only lead the chain")]
  MisplacedTrigger { index: usize },

  #[error("duplicate step id: {0}")]
  DuplicateStepId(String),

  #[error("workflow has no identifier")]
  MissingId,
}
