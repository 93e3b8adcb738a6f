//! Bounded readiness polling for the daemon

use crate::client::DaemonClient;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a readiness wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Readiness {
    /// Daemon answered a health check; `attempts` were made in total
    Ready { attempts: u32 },
    /// The attempt budget was exhausted without a single success
    TimedOut { attempts: u32 },
}

/// Polls the daemon's health endpoint until it answers or the attempt budget
/// is exhausted
///
/// Fixed interval, no backoff: daemon startup on a local loopback is a
/// bounded wait, not a congestion problem. The probe sleeps only between
/// attempts, so readiness on attempt k costs exactly k requests and k-1
/// sleeps.
pub struct ReadinessProbe {
    client: DaemonClient,
    max_attempts: u32,
    interval: Duration,
}

impl ReadinessProbe {
    /// Create a probe with the given attempt budget and interval
    pub fn new(client: DaemonClient, max_attempts: u32, interval: Duration) -> Self {
        Self {
            client,
            max_attempts,
            interval,
        }
    }

    /// Poll until ready or out of attempts
    pub async fn wait_ready(&self) -> Readiness {
        for attempt in 1..=self.max_attempts {
            if self.client.healthy().await {
                info!(attempt = attempt, "daemon is ready");
                return Readiness::Ready { attempts: attempt };
            }

            debug!(
                attempt = attempt,
                max_attempts = self.max_attempts,
                "daemon not ready yet"
            );

            if attempt < self.max_attempts {
                tokio::time::sleep(self.interval).await;
            }
        }

        warn!(
            attempts = self.max_attempts,
            "daemon never became ready within the attempt budget"
        );
        Readiness::TimedOut {
            attempts: self.max_attempts,
        }
    }
}
