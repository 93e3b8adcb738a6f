//! Execution-backend submission boundary

use crate::lifecycle::Launcher;
use async_trait::async_trait;
use remlet_core::{InferenceJob, LaunchError, LaunchResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Where a job runs
///
/// The backend places the job on suitable hardware and enforces the job's
/// overall wall-clock budget. The lifecycle inside never measures its own
/// total runtime; the budget lives here, at the boundary that owns placement.
#[async_trait]
pub trait ExecutionBackend: Send + Sync {
    /// Run the job to completion and return its output text
    async fn submit(&self, job: &InferenceJob) -> LaunchResult<String>;

    /// Get the backend name
    fn name(&self) -> &'static str;
}

/// Runs the lifecycle in-process under the job's budget
///
/// When the budget elapses the lifecycle future is dropped mid-flight and the
/// daemon child is reclaimed by the runtime's kill-on-drop backstop; there is
/// no graceful mid-inference cancellation.
pub struct LocalBackend {
    launcher: Launcher,
}

impl LocalBackend {
    /// Create a backend around a wired launcher
    pub fn new(launcher: Launcher) -> Self {
        Self { launcher }
    }
}

#[async_trait]
impl ExecutionBackend for LocalBackend {
    async fn submit(&self, job: &InferenceJob) -> LaunchResult<String> {
        match tokio::time::timeout(job.timeout(), self.launcher.run(job)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(job_id = %job.id, budget = ?job.timeout(), "job exceeded its budget, abandoning");
                Err(LaunchError::JobTimeout(job.timeout()))
            }
        }
    }

    fn name(&self) -> &'static str {
        "local"
    }
}

/// Entry point callers hand jobs to
///
/// Serializes the job as the dispatch envelope, records the requested GPU
/// class, and blocks until the backend returns a result or failure. Nothing
/// is retried here; resubmission is the caller's decision.
pub struct Submitter {
    backend: Arc<dyn ExecutionBackend>,
}

impl Submitter {
    /// Create a submitter for the given backend
    pub fn new(backend: Arc<dyn ExecutionBackend>) -> Self {
        Self { backend }
    }

    /// Submit one job and wait for its output
    pub async fn submit(&self, job: InferenceJob) -> LaunchResult<String> {
        let envelope = serde_json::to_string(&job)?;
        debug!(envelope = %envelope, "job envelope");

        info!(
            job_id = %job.id,
            model = %job.model,
            gpu = %job.gpu,
            timeout_secs = job.timeout_secs,
            backend = self.backend.name(),
            "submitting job"
        );

        let started = Instant::now();
        let result = self.backend.submit(&job).await;

        match &result {
            Ok(_) => info!(job_id = %job.id, elapsed = ?started.elapsed(), "job returned output"),
            Err(e) => warn!(job_id = %job.id, elapsed = ?started.elapsed(), error = %e, "job came back failed"),
        }

        result
    }
}
