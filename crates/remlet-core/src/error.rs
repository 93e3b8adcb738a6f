//! Error types for remlet

use std::time::Duration;
use thiserror::Error;

/// Main error type for remlet
///
/// One variant per failure kind a job can hit, so callers can tell a timeout
/// from a rejection from a transport fault without matching on message text.
#[derive(Error, Debug)]
pub enum LaunchError {
    /// Daemon never became reachable within the attempt budget
    #[error("daemon not ready after {attempts} attempts")]
    ReadinessTimeout {
        /// Number of health-check attempts made
        attempts: u32,
        /// Captured tail of the daemon's stderr stream
        stderr: String,
    },

    /// Daemon refused or failed the model pull
    #[error("model pull rejected: {0}")]
    PullRejected(String),

    /// Model pull exceeded its wall-clock budget
    #[error("model pull timed out after {0:?}")]
    PullTimeout(Duration),

    /// Daemon returned a structured chat-time error
    #[error("chat error from daemon: {0}")]
    Chat(String),

    /// Connectivity or malformed-response failure during an HTTP call
    #[error("transport error: {0}")]
    Transport(String),

    /// The whole job exceeded the budget enforced by the execution backend
    #[error("job exceeded its {0:?} budget")]
    JobTimeout(Duration),

    /// Daemon process could not be started
    #[error("failed to spawn daemon: {0}")]
    Spawn(String),

    /// Process-management failure after spawn
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type for remlet operations
pub type LaunchResult<T> = Result<T, LaunchError>;

impl From<reqwest::Error> for LaunchError {
    fn from(err: reqwest::Error) -> Self {
        LaunchError::Transport(err.to_string())
    }
}

impl From<serde_json::Error> for LaunchError {
    fn from(err: serde_json::Error) -> Self {
        LaunchError::Transport(err.to_string())
    }
}

impl From<toml::de::Error> for LaunchError {
    fn from(err: toml::de::Error) -> Self {
        LaunchError::Config(err.to_string())
    }
}
