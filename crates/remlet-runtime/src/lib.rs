//! remlet-runtime: Daemon process runtime
//!
//! This crate owns the serving daemon's process lifecycle:
//! - Spawning the daemon as a background child process
//! - Capturing a bounded tail of its stderr for diagnostics
//! - Guaranteed termination (SIGTERM, graceful wait, SIGKILL escalation)

pub mod process;
pub mod stderr;
pub mod traits;

pub use process::ProcessRuntime;
pub use stderr::StderrTail;
pub use traits::{DaemonHandle, DaemonRuntime};
