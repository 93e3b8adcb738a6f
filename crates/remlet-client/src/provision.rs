//! Model provisioning with a hard wall-clock budget

use crate::client::DaemonClient;
use remlet_core::{LaunchError, LaunchResult};
use std::time::Duration;
use tracing::{info, warn};

/// Ensures a named model is present locally before inference
///
/// One blocking pull under a hard timeout. The pull budget is independent of
/// both the readiness budget and the overall job budget. Rejection and
/// timeout are distinct failures and both are fatal to the job; retry policy
/// belongs to whoever resubmits the whole job.
pub struct Provisioner {
    client: DaemonClient,
    timeout: Duration,
}

impl Provisioner {
    /// Create a provisioner with the given pull budget
    pub fn new(client: DaemonClient, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Pull the model, failing with `PullTimeout` once the budget elapses
    pub async fn ensure(&self, model: &str) -> LaunchResult<()> {
        info!(model = model, timeout = ?self.timeout, "pulling model");

        match tokio::time::timeout(self.timeout, self.client.pull(model)).await {
            Ok(Ok(())) => {
                info!(model = model, "model is available");
                Ok(())
            }
            Ok(Err(e)) => {
                warn!(model = model, error = %e, "model pull failed");
                Err(e)
            }
            Err(_) => {
                warn!(model = model, timeout = ?self.timeout, "model pull timed out");
                Err(LaunchError::PullTimeout(self.timeout))
            }
        }
    }
}
