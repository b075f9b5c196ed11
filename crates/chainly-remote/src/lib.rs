//! Chainly Remote
//!
//! Shared plumbing for talking to remote collaborators (the workflow store and
//! the step executor). Transport failures never escape this crate as errors:
//! every call resolves to a [`RemoteOutcome`], and callers decide how to fall
//! back when the remote is [`Unavailable`](RemoteOutcome::Unavailable).

mod config;
mod http;
mod outcome;

pub use config::{DEFAULT_TIMEOUT, RemoteConfig, RemoteConfigError};
pub use http::fetch_json;
pub use outcome::{RemoteOutcome, with_deadline};
