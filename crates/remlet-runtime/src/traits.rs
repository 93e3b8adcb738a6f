//! Runtime trait definitions

use async_trait::async_trait;
use remlet_core::LaunchResult;

/// Runtime trait for spawning the serving daemon
#[async_trait]
pub trait DaemonRuntime: Send + Sync {
    /// Spawn a new daemon process and hand back its handle
    async fn spawn(&self) -> LaunchResult<Box<dyn DaemonHandle>>;

    /// Get the runtime name
    fn name(&self) -> &'static str;
}

/// Handle to a running daemon process
///
/// A handle must not outlive the scope that spawned it: the owner calls
/// `shutdown` exactly once on every exit path, and the terminate+wait pair
/// runs at most once per handle regardless of repeated calls.
#[async_trait]
pub trait DaemonHandle: Send + std::fmt::Debug {
    /// OS process id, if the process is still attached
    fn pid(&self) -> Option<u32>;

    /// Whether the process has not yet exited
    async fn is_running(&mut self) -> bool;

    /// Snapshot of the captured stderr tail
    async fn stderr_tail(&self) -> String;

    /// Terminate the daemon and await its exit
    async fn shutdown(&mut self) -> LaunchResult<()>;
}
