//! remlet-launcher: Job lifecycle orchestration
//!
//! This crate sequences one inference job end to end:
//! - Spawn the daemon, wait for readiness, pull the model, run one chat
//! - Guarantee daemon shutdown on every exit path
//! - Hand the whole lifecycle to an execution backend as one unit of work

pub mod lifecycle;
pub mod submit;

pub use lifecycle::{JobPhase, Launcher};
pub use submit::{ExecutionBackend, LocalBackend, Submitter};
