//! Inference job description

use crate::gpu::GpuClass;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Default model when the caller does not name one
pub const DEFAULT_MODEL: &str = "dolphin-mixtral";

/// Default wall-clock budget for a whole job in seconds
pub const DEFAULT_JOB_TIMEOUT_SECS: u64 = 1800;

/// One end-to-end unit of work: spawn a daemon, wait for readiness, pull the
/// model, run one inference, guarantee shutdown.
///
/// The job is an immutable value; the execution backend serializes it as the
/// dispatch envelope. Building a job is decoupled from where it runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceJob {
    /// Unique job identifier
    pub id: Uuid,
    /// The single user prompt to run
    pub prompt: String,
    /// Model reference to pull and query (e.g. "dolphin-mixtral")
    pub model: String,
    /// Accelerator class requested from the execution backend
    pub gpu: GpuClass,
    /// Wall-clock budget for the whole job in seconds
    pub timeout_secs: u64,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl InferenceJob {
    /// Create a new job with default GPU class and budget
    pub fn new(prompt: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: prompt.into(),
            model: model.into(),
            gpu: GpuClass::default(),
            timeout_secs: DEFAULT_JOB_TIMEOUT_SECS,
            created_at: Utc::now(),
        }
    }

    /// Set the accelerator class
    pub fn with_gpu(mut self, gpu: GpuClass) -> Self {
        self.gpu = gpu;
        self
    }

    /// Set the wall-clock budget in seconds
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// The job's wall-clock budget as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}
