//! Editing sessions for chainly workflows.
//!
//! A [`WorkflowBuilder`] owns one workflow definition under construction plus
//! a pointer to the currently selected step. It is created once per editing
//! session and every mutation goes through it; the step-chain invariants hold
//! after each call.

mod builder;
mod error;

pub use builder::{
  DEFAULT_ACTION_NAME, DEFAULT_TRIGGER_NAME, PLACEHOLDER_STEP_NAME, WorkflowBuilder,
};
pub use error::BuilderError;
