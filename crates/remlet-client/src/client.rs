//! HTTP client for the daemon's loopback API

use remlet_core::{LaunchError, LaunchResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Request body for a model pull
#[derive(Debug, Serialize)]
pub struct PullRequest {
    /// Model reference to pull
    pub name: String,
    /// Pull synchronously; the response arrives once the model is local
    pub stream: bool,
}

/// One message in a chat exchange
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    /// A user-role message carrying the prompt
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Request body for a chat completion
#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub stream: bool,
}

/// Successful chat response
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub message: ChatMessage,
}

/// Structured error body the daemon returns on failure
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Client for the daemon's HTTP API
#[derive(Clone)]
pub struct DaemonClient {
    base_url: String,
    http: reqwest::Client,
}

impl DaemonClient {
    /// Create a client for the given base URL (e.g. "http://127.0.0.1:11434")
    pub fn new(base_url: &str) -> LaunchResult<Self> {
        Self::build(base_url, None)
    }

    /// Create a client with a per-request timeout
    ///
    /// Used by the readiness probe so a hung socket cannot stall the attempt
    /// budget. The pull and chat paths stay unbounded here; their budgets are
    /// enforced by the provisioner and the execution backend.
    pub fn with_request_timeout(base_url: &str, timeout: Duration) -> LaunchResult<Self> {
        Self::build(base_url, Some(timeout))
    }

    fn build(base_url: &str, timeout: Option<Duration>) -> LaunchResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        let http = builder
            .build()
            .map_err(|e| LaunchError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// Full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Lightweight health check against the version endpoint
    ///
    /// Any response in the success range counts as healthy; the body is
    /// ignored. Connection errors and non-2xx responses return false.
    pub async fn healthy(&self) -> bool {
        match self.http.get(self.url("/api/version")).send().await {
            Ok(response) => {
                let healthy = response.status().is_success();
                if !healthy {
                    debug!(status = %response.status(), "version check returned non-success");
                }
                healthy
            }
            Err(e) => {
                debug!(error = %e, "version check failed to connect");
                false
            }
        }
    }

    /// Pull a model, blocking until it is local or the daemon rejects it
    ///
    /// A daemon-side rejection surfaces as `PullRejected` with the daemon's
    /// message. The caller owns the wall-clock budget.
    pub async fn pull(&self, model: &str) -> LaunchResult<()> {
        let req = PullRequest {
            name: model.to_string(),
            stream: false,
        };

        let response = self
            .http
            .post(self.url("/api/pull"))
            .json(&req)
            .send()
            .await?;

        if response.status().is_success() {
            debug!(model = model, "model pull completed");
            Ok(())
        } else {
            let body = response.text().await.unwrap_or_default();
            let message = match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => err.error,
                Err(_) => body,
            };
            Err(LaunchError::PullRejected(message))
        }
    }

    /// Run one chat completion and return the response text
    ///
    /// A structured `{"error": ...}` from the daemon becomes
    /// `LaunchError::Chat` with the message preserved verbatim; any other
    /// failure (connectivity, undecodable body) becomes `Transport`.
    pub async fn chat(&self, model: &str, prompt: &str) -> LaunchResult<String> {
        let req = ChatRequest {
            model: model.to_string(),
            messages: vec![ChatMessage::user(prompt)],
            stream: false,
        };

        let response = self
            .http
            .post(self.url("/api/chat"))
            .json(&req)
            .send()
            .await?;

        if response.status().is_success() {
            let chat: ChatResponse = response
                .json()
                .await
                .map_err(|e| LaunchError::Transport(format!("malformed chat response: {}", e)))?;
            Ok(chat.message.content)
        } else {
            let body = response.text().await.unwrap_or_default();
            match serde_json::from_str::<ErrorBody>(&body) {
                Ok(err) => Err(LaunchError::Chat(err.error)),
                Err(_) => Err(LaunchError::Transport(format!(
                    "unexpected chat response: {}",
                    body
                ))),
            }
        }
    }
}
