//! GPU class placement requests

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Accelerator class a job requests from the execution backend
///
/// remlet never inspects local hardware; the class travels with the job
/// description and the backend places the job on a matching machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuClass {
    A10G,
    A100,
    L4,
    T4,
    /// CPU-only placement, for small models and smoke tests
    Cpu,
}

impl Default for GpuClass {
    fn default() -> Self {
        GpuClass::A10G
    }
}

impl std::fmt::Display for GpuClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuClass::A10G => write!(f, "A10G"),
            GpuClass::A100 => write!(f, "A100"),
            GpuClass::L4 => write!(f, "L4"),
            GpuClass::T4 => write!(f, "T4"),
            GpuClass::Cpu => write!(f, "CPU"),
        }
    }
}

impl FromStr for GpuClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "a10g" => Ok(GpuClass::A10G),
            "a100" => Ok(GpuClass::A100),
            "l4" => Ok(GpuClass::L4),
            "t4" => Ok(GpuClass::T4),
            "cpu" | "none" => Ok(GpuClass::Cpu),
            other => Err(format!("unknown GPU class: {}", other)),
        }
    }
}
