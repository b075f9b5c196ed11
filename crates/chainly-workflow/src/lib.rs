//! Chainly Workflow
//!
//! This crate contains the workflow definition types for chainly: a linear
//! chain of steps made of exactly one leading trigger followed by one or more
//! actions.
//!
//! Definitions are exchanged as JSON with the remote store and the local cache.
//! [`WorkflowDefinition::validate`] checks the step-ordering invariant; every
//! definition must pass it before it is persisted.

mod error;
mod step;
mod summary;
mod workflow;

pub use error::ValidationError;
pub use step::{Step, StepConfig, StepKind};
pub use summary::WorkflowSummary;
pub use workflow::{DEFAULT_WORKFLOW_NAME, WorkflowDefinition};
