//! Process-based daemon runtime
//!
//! Runs the serving daemon as a direct OS child process. The daemon binds a
//! loopback port and is owned exclusively by one job; `kill_on_drop` backstops
//! reclamation when the execution backend abandons a job past its budget.

use async_trait::async_trait;
use remlet_core::{DaemonSettings, LaunchError, LaunchResult};
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::stderr::StderrTail;
use crate::traits::{DaemonHandle, DaemonRuntime};

/// Process-based runtime for the serving daemon
pub struct ProcessRuntime {
    settings: DaemonSettings,
}

impl ProcessRuntime {
    /// Create a new process runtime
    pub fn new(settings: DaemonSettings) -> Self {
        Self { settings }
    }

    /// Build the command to start the daemon
    fn build_command(&self) -> Command {
        let mut cmd = Command::new(&self.settings.binary);

        for arg in &self.settings.args {
            cmd.arg(arg);
        }

        // Ollama-compatible daemons take their bind address from the environment
        cmd.env(
            "OLLAMA_HOST",
            format!("{}:{}", self.settings.host, self.settings.port),
        );

        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());
        cmd.kill_on_drop(true);

        cmd
    }
}

#[async_trait]
impl DaemonRuntime for ProcessRuntime {
    async fn spawn(&self) -> LaunchResult<Box<dyn DaemonHandle>> {
        info!(
            binary = %self.settings.binary.display(),
            port = self.settings.port,
            "starting daemon process"
        );

        let mut cmd = self.build_command();
        let mut child = cmd.spawn().map_err(|e| {
            LaunchError::Spawn(format!("{}: {}", self.settings.binary.display(), e))
        })?;

        let tail = child
            .stderr
            .take()
            .map(|stderr| StderrTail::capture(stderr, self.settings.stderr_tail_lines));

        debug!(pid = child.id(), "daemon process spawned");

        Ok(Box::new(ProcessHandle {
            child,
            tail,
            grace: Duration::from_secs(self.settings.shutdown_grace_secs),
            terminated: false,
        }))
    }

    fn name(&self) -> &'static str {
        "process"
    }
}

/// Handle to a spawned daemon process
#[derive(Debug)]
pub struct ProcessHandle {
    child: Child,
    tail: Option<StderrTail>,
    grace: Duration,
    terminated: bool,
}

impl ProcessHandle {
    /// Ask the process to exit
    fn request_termination(&self) {
        let Some(pid) = self.child.id() else {
            return;
        };

        #[cfg(unix)]
        {
            use std::process::Command as StdCommand;
            let _ = StdCommand::new("kill")
                .arg("-TERM")
                .arg(pid.to_string())
                .output();
        }

        #[cfg(windows)]
        {
            use std::process::Command as StdCommand;
            let _ = StdCommand::new("taskkill")
                .arg("/PID")
                .arg(pid.to_string())
                .arg("/F")
                .output();
        }
    }
}

#[async_trait]
impl DaemonHandle for ProcessHandle {
    fn pid(&self) -> Option<u32> {
        self.child.id()
    }

    async fn is_running(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    async fn stderr_tail(&self) -> String {
        match &self.tail {
            Some(tail) => tail.snapshot().await,
            None => String::new(),
        }
    }

    async fn shutdown(&mut self) -> LaunchResult<()> {
        if self.terminated {
            return Ok(());
        }
        self.terminated = true;

        let pid = self.child.id();
        info!(pid = pid, "stopping daemon process");

        self.request_termination();

        match tokio::time::timeout(self.grace, self.child.wait()).await {
            Ok(Ok(status)) => {
                debug!(pid = pid, status = %status, "daemon process exited");
                Ok(())
            }
            Ok(Err(e)) => Err(LaunchError::Runtime(format!(
                "failed waiting for daemon exit: {}",
                e
            ))),
            Err(_) => {
                warn!(pid = pid, grace = ?self.grace, "daemon ignored termination, killing");
                self.child
                    .kill()
                    .await
                    .map_err(|e| LaunchError::Runtime(format!("failed to kill daemon: {}", e)))
            }
        }
    }
}
