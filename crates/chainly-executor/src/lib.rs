//! Step test execution for chainly workflows.
//!
//! [`ExecutorGateway`] runs a "test this step" request against a remote
//! executor and, when the remote cannot be reached, answers with a simulated
//! result instead. Both paths produce the same [`ExecutionResult`] shape.

mod gateway;
mod remote;
mod result;
mod simulate;

pub use gateway::{DEFAULT_SIMULATED_LATENCY, ExecutorGateway};
pub use remote::{HttpExecutor, OfflineExecutor, RemoteExecutor};
pub use result::ExecutionResult;
pub use simulate::simulated_message;
