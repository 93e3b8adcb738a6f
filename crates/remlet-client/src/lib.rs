//! remlet-client: HTTP client for the model-serving daemon
//!
//! This crate provides the daemon-facing operations:
//! - Version health check, model pull, single chat completion
//! - Bounded fixed-interval readiness polling
//! - Model provisioning with a hard timeout

pub mod client;
pub mod probe;
pub mod provision;

pub use client::DaemonClient;
pub use probe::{Readiness, ReadinessProbe};
pub use provision::Provisioner;
