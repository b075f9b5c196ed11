use chainly_store::SaveError;

/// Errors surfaced by an editing session.
#[derive(Debug, thiserror::Error)]
pub enum BuilderError {
  /// The referenced step is not part of the workflow.
  #[error("step '{0}' not found in workflow")]
  StepNotFound(String),

  /// No step is selected.
  #[error("no step selected")]
  NoSelection,

  /// Publishing failed.
  #[error("failed to publish workflow: {0}")]
  Publish(#[from] SaveError),
}
