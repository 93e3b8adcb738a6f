//! Job lifecycle state machine

use remlet_client::{DaemonClient, Provisioner, Readiness, ReadinessProbe};
use remlet_core::{InferenceJob, LaunchError, LaunchResult, LauncherConfig};
use remlet_runtime::{DaemonHandle, DaemonRuntime};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Phase a job moves through
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobPhase {
    /// Daemon process is being spawned
    Starting,
    /// Polling the daemon's health endpoint
    WaitingForDaemon,
    /// Pulling the model
    Provisioning,
    /// Running the chat completion
    Invoking,
    /// Terminating the daemon
    ShuttingDown,
    /// Job finished with output
    Succeeded,
    /// Job finished with an error
    Failed,
}

impl std::fmt::Display for JobPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobPhase::Starting => write!(f, "Starting"),
            JobPhase::WaitingForDaemon => write!(f, "WaitingForDaemon"),
            JobPhase::Provisioning => write!(f, "Provisioning"),
            JobPhase::Invoking => write!(f, "Invoking"),
            JobPhase::ShuttingDown => write!(f, "ShuttingDown"),
            JobPhase::Succeeded => write!(f, "Succeeded"),
            JobPhase::Failed => write!(f, "Failed"),
        }
    }
}

/// Sequences one job: spawn daemon, wait for readiness, provision the model,
/// run one inference, and shut the daemon down on every exit path
///
/// The daemon handle never leaves `run`: it is acquired at the top, threaded
/// through the fallible middle, and released unconditionally at the bottom.
/// Exactly one terminate+wait pair per spawn, whatever failed in between.
pub struct Launcher {
    runtime: Arc<dyn DaemonRuntime>,
    client: DaemonClient,
    probe: ReadinessProbe,
    provisioner: Provisioner,
}

impl Launcher {
    /// Wire a launcher from configuration
    pub fn new(runtime: Arc<dyn DaemonRuntime>, config: &LauncherConfig) -> LaunchResult<Self> {
        let endpoint = config.daemon.endpoint();
        let client = DaemonClient::new(&endpoint)?;

        // The probe gets its own client so a hung health check is bounded
        // per attempt instead of eating the whole attempt budget
        let probe_client =
            DaemonClient::with_request_timeout(&endpoint, config.readiness.request_timeout())?;
        let probe = ReadinessProbe::new(
            probe_client,
            config.readiness.max_attempts,
            config.readiness.interval(),
        );

        let provisioner = Provisioner::new(client.clone(), config.provision.pull_timeout());

        Ok(Self {
            runtime,
            client,
            probe,
            provisioner,
        })
    }

    /// Run one job to completion
    pub async fn run(&self, job: &InferenceJob) -> LaunchResult<String> {
        info!(
            job_id = %job.id,
            model = %job.model,
            phase = %JobPhase::Starting,
            runtime = self.runtime.name(),
            "starting job"
        );

        let mut daemon = self.runtime.spawn().await?;
        let outcome = self.drive(job, daemon.as_mut()).await;

        debug!(job_id = %job.id, phase = %JobPhase::ShuttingDown, "stopping daemon");
        if let Err(e) = daemon.shutdown().await {
            // The job outcome stands; a stuck teardown is the operator's
            // problem, not the caller's
            warn!(job_id = %job.id, error = %e, "daemon shutdown failed");
        }

        match &outcome {
            Ok(_) => info!(job_id = %job.id, phase = %JobPhase::Succeeded, "job finished"),
            Err(e) => warn!(job_id = %job.id, phase = %JobPhase::Failed, error = %e, "job failed"),
        }

        outcome
    }

    /// The fallible middle of the lifecycle, between spawn and shutdown
    async fn drive(
        &self,
        job: &InferenceJob,
        daemon: &mut dyn DaemonHandle,
    ) -> LaunchResult<String> {
        info!(job_id = %job.id, phase = %JobPhase::WaitingForDaemon, "waiting for daemon");
        match self.probe.wait_ready().await {
            Readiness::Ready { attempts } => {
                debug!(attempts = attempts, "daemon answered health check");
            }
            Readiness::TimedOut { attempts } => {
                let stderr = daemon.stderr_tail().await;
                return Err(LaunchError::ReadinessTimeout { attempts, stderr });
            }
        }

        info!(job_id = %job.id, phase = %JobPhase::Provisioning, model = %job.model, "provisioning model");
        self.provisioner.ensure(&job.model).await?;

        info!(job_id = %job.id, phase = %JobPhase::Invoking, "running inference");
        self.client.chat(&job.model, &job.prompt).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use remlet_core::DaemonSettings;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// Runtime double that hands out handles and counts their terminations
    struct MockRuntime {
        shutdowns: Arc<AtomicUsize>,
        stderr: String,
        fail_spawn: bool,
    }

    impl MockRuntime {
        fn new() -> (Arc<Self>, Arc<AtomicUsize>) {
            let shutdowns = Arc::new(AtomicUsize::new(0));
            let runtime = Arc::new(Self {
                shutdowns: Arc::clone(&shutdowns),
                stderr: "mock daemon stderr".to_string(),
                fail_spawn: false,
            });
            (runtime, shutdowns)
        }

        fn failing_spawn() -> (Arc<Self>, Arc<AtomicUsize>) {
            let shutdowns = Arc::new(AtomicUsize::new(0));
            let runtime = Arc::new(Self {
                shutdowns: Arc::clone(&shutdowns),
                stderr: String::new(),
                fail_spawn: true,
            });
            (runtime, shutdowns)
        }
    }

    #[derive(Debug)]
    struct MockHandle {
        shutdowns: Arc<AtomicUsize>,
        stderr: String,
    }

    #[async_trait]
    impl DaemonRuntime for MockRuntime {
        async fn spawn(&self) -> LaunchResult<Box<dyn DaemonHandle>> {
            if self.fail_spawn {
                return Err(LaunchError::Spawn("mock spawn failure".to_string()));
            }
            Ok(Box::new(MockHandle {
                shutdowns: Arc::clone(&self.shutdowns),
                stderr: self.stderr.clone(),
            }))
        }

        fn name(&self) -> &'static str {
            "mock"
        }
    }

    #[async_trait]
    impl DaemonHandle for MockHandle {
        fn pid(&self) -> Option<u32> {
            Some(4242)
        }

        async fn is_running(&mut self) -> bool {
            true
        }

        async fn stderr_tail(&self) -> String {
            self.stderr.clone()
        }

        async fn shutdown(&mut self) -> LaunchResult<()> {
            self.shutdowns.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    /// Config pointed at the mock server, with a small probe budget
    fn config_for(server: &MockServer, max_attempts: u32) -> LauncherConfig {
        let addr = server.address();
        let mut config = LauncherConfig::default();
        config.daemon = DaemonSettings {
            host: addr.ip().to_string(),
            port: addr.port(),
            ..DaemonSettings::default()
        };
        config.readiness.max_attempts = max_attempts;
        config.readiness.interval_secs = 1;
        config.provision.pull_timeout_secs = 5;
        config
    }

    async fn mount_ready(server: &MockServer) {
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"version": "0.5.1"})))
            .mount(server)
            .await;
    }

    async fn mount_pull_ok(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "success"})))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_success_path_returns_output_and_shuts_down_once() {
        let server = MockServer::start().await;
        mount_ready(&server).await;
        mount_pull_ok(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": {"role": "assistant", "content": "hello"}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let (runtime, shutdowns) = MockRuntime::new();
        let launcher = Launcher::new(runtime, &config_for(&server, 3)).unwrap();
        let job = InferenceJob::new("hi", "llama3");

        let output = launcher.run(&job).await.unwrap();
        assert_eq!(output, "hello");
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_readiness_timeout_captures_stderr_and_shuts_down() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/version"))
            .respond_with(ResponseTemplate::new(500))
            .expect(2)
            .mount(&server)
            .await;
        // Neither pull nor chat must be attempted
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (runtime, shutdowns) = MockRuntime::new();
        let launcher = Launcher::new(runtime, &config_for(&server, 2)).unwrap();
        let job = InferenceJob::new("hi", "llama3");

        let err = launcher.run(&job).await.unwrap_err();
        match err {
            LaunchError::ReadinessTimeout { attempts, stderr } => {
                assert_eq!(attempts, 2);
                assert_eq!(stderr, "mock daemon stderr");
            }
            other => panic!("expected ReadinessTimeout, got {:?}", other),
        }
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_pull_rejection_skips_inference_and_shuts_down() {
        let server = MockServer::start().await;
        mount_ready(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/pull"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"error": "unknown model"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (runtime, shutdowns) = MockRuntime::new();
        let launcher = Launcher::new(runtime, &config_for(&server, 3)).unwrap();
        let job = InferenceJob::new("hi", "nonexistent-model");

        let err = launcher.run(&job).await.unwrap_err();
        assert!(matches!(err, LaunchError::PullRejected(_)));
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_chat_failure_still_shuts_down_once() {
        let server = MockServer::start().await;
        mount_ready(&server).await;
        mount_pull_ok(&server).await;
        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(500).set_body_json(json!({"error": "model crashed"})),
            )
            .mount(&server)
            .await;

        let (runtime, shutdowns) = MockRuntime::new();
        let launcher = Launcher::new(runtime, &config_for(&server, 3)).unwrap();
        let job = InferenceJob::new("hi", "llama3");

        let err = launcher.run(&job).await.unwrap_err();
        match err {
            LaunchError::Chat(msg) => assert_eq!(msg, "model crashed"),
            other => panic!("expected Chat, got {:?}", other),
        }
        assert_eq!(shutdowns.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_spawn_failure_means_no_handle_to_release() {
        let server = MockServer::start().await;
        let (runtime, shutdowns) = MockRuntime::failing_spawn();
        let launcher = Launcher::new(runtime, &config_for(&server, 3)).unwrap();
        let job = InferenceJob::new("hi", "llama3");

        let err = launcher.run(&job).await.unwrap_err();
        assert!(matches!(err, LaunchError::Spawn(_)));
        assert_eq!(shutdowns.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_phase_display() {
        assert_eq!(JobPhase::WaitingForDaemon.to_string(), "WaitingForDaemon");
        assert_eq!(JobPhase::Succeeded.to_string(), "Succeeded");
    }
}
