//! remlet CLI
//!
//! Command-line front end: builds one inference job from the arguments and
//! submits it through the local execution backend.

use clap::Parser;
use remlet_core::{GpuClass, InferenceJob, LaunchError, LauncherConfig};
use remlet_launcher::{Launcher, LocalBackend, Submitter};
use remlet_runtime::ProcessRuntime;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

/// remlet - single-shot inference job launcher for Ollama-compatible daemons
#[derive(Parser, Debug)]
#[command(name = "remlet")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Prompt to run
    prompt: String,

    /// Model to pull and query
    #[arg(long)]
    model: Option<String>,

    /// Accelerator class to request (a10g, a100, l4, t4, cpu)
    #[arg(long)]
    gpu: Option<GpuClass>,

    /// Wall-clock budget for the whole job in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to the daemon binary
    #[arg(long)]
    daemon_bin: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LauncherConfig::from_file(path)?,
        None => LauncherConfig::default(),
    };
    if let Some(bin) = cli.daemon_bin {
        config.daemon.binary = bin;
    }

    // Initialize logging
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        match config.logging.level.to_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);

    let model = cli
        .model
        .unwrap_or_else(|| config.job.default_model.clone());
    let job = InferenceJob::new(cli.prompt, model)
        .with_gpu(cli.gpu.unwrap_or(config.job.gpu))
        .with_timeout_secs(cli.timeout_secs.unwrap_or(config.job.timeout_secs));

    let runtime = Arc::new(ProcessRuntime::new(config.daemon.clone()));
    let launcher = Launcher::new(runtime, &config)?;
    let submitter = Submitter::new(Arc::new(LocalBackend::new(launcher)));

    match submitter.submit(job).await {
        Ok(output) => {
            println!("\nModel output:");
            println!("{}", output);
            Ok(())
        }
        Err(e) => {
            if let LaunchError::ReadinessTimeout { stderr, .. } = &e {
                if !stderr.is_empty() {
                    eprintln!("daemon stderr:\n{}", stderr);
                }
            }
            Err(e.into())
        }
    }
}
