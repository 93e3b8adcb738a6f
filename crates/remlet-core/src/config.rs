//! Configuration types for remlet

use crate::gpu::GpuClass;
use crate::job::{DEFAULT_JOB_TIMEOUT_SECS, DEFAULT_MODEL};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Main launcher configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Daemon process configuration
    pub daemon: DaemonSettings,
    /// Readiness probe configuration
    pub readiness: ReadinessSettings,
    /// Model provisioning configuration
    pub provision: ProvisionSettings,
    /// Job defaults
    pub job: JobSettings,
    /// Logging configuration
    pub logging: LoggingSettings,
}

impl LauncherConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::LaunchError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::LaunchError::Config(format!("failed to read config file: {}", e))
        })?;
        toml::from_str(&content)
            .map_err(|e| crate::LaunchError::Config(format!("failed to parse config: {}", e)))
    }
}

/// Daemon process settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DaemonSettings {
    /// Path to the serving daemon binary
    pub binary: PathBuf,
    /// Loopback address the daemon binds
    pub host: String,
    /// Port the daemon binds
    pub port: u16,
    /// Arguments passed to the daemon binary (the serve subcommand)
    pub args: Vec<String>,
    /// Number of stderr lines retained for diagnostics
    pub stderr_tail_lines: usize,
    /// Grace period before SIGTERM escalates to SIGKILL, in seconds
    pub shutdown_grace_secs: u64,
}

impl Default for DaemonSettings {
    fn default() -> Self {
        Self {
            binary: PathBuf::from("ollama"),
            host: "127.0.0.1".to_string(),
            port: 11434,
            args: vec!["serve".to_string()],
            stderr_tail_lines: 64,
            shutdown_grace_secs: 5,
        }
    }
}

impl DaemonSettings {
    /// Base URL of the daemon's HTTP API
    pub fn endpoint(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Readiness probe settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadinessSettings {
    /// Maximum number of health-check attempts
    pub max_attempts: u32,
    /// Fixed interval between attempts, in seconds
    pub interval_secs: u64,
    /// Per-attempt request timeout, in seconds
    pub request_timeout_secs: u64,
}

impl Default for ReadinessSettings {
    fn default() -> Self {
        Self {
            max_attempts: 30,
            interval_secs: 1,
            request_timeout_secs: 5,
        }
    }
}

impl ReadinessSettings {
    /// Interval between attempts as a `Duration`
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Per-attempt request timeout as a `Duration`
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Model provisioning settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionSettings {
    /// Wall-clock budget for the model pull, in seconds
    pub pull_timeout_secs: u64,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            pull_timeout_secs: 600,
        }
    }
}

impl ProvisionSettings {
    /// Pull budget as a `Duration`
    pub fn pull_timeout(&self) -> Duration {
        Duration::from_secs(self.pull_timeout_secs)
    }
}

/// Job defaults applied when the caller leaves a field unset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobSettings {
    /// Default model reference
    pub default_model: String,
    /// Default accelerator class
    pub gpu: GpuClass,
    /// Default wall-clock budget for the whole job, in seconds
    pub timeout_secs: u64,
}

impl Default for JobSettings {
    fn default() -> Self {
        Self {
            default_model: DEFAULT_MODEL.to_string(),
            gpu: GpuClass::default(),
            timeout_secs: DEFAULT_JOB_TIMEOUT_SECS,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level
    pub level: String,
    /// Log format (json or text)
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "text".to_string(),
        }
    }
}
