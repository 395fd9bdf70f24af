//! Nullable catalyst prober: scripted health and status answers.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use realm_discovery::CatalystProber;
use realm_types::{HealthReport, HealthStatus, Node, PingResult, StatusPayload};

#[derive(Default)]
struct Script {
    healthy: HashSet<String>,
    pings: HashMap<String, PingResult>,
    delays: HashMap<String, Duration>,
    health_calls: usize,
    ping_calls: usize,
}

/// A prober that answers from a script instead of the network.
///
/// Unscripted nodes are unhealthy and unreachable. Clones share the script,
/// so a test can keep one clone and re-script nodes while a client owns the
/// other.
#[derive(Clone, Default)]
pub struct NullProber {
    script: Arc<Mutex<Script>>,
}

fn key(domain: &str) -> String {
    Node::new(domain)
        .map(|node| node.domain)
        .unwrap_or_else(|_| domain.to_string())
}

impl NullProber {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Script a healthy node answering its status probe with `payload`.
    pub fn serve(&self, domain: &str, elapsed_ms: u64, payload: StatusPayload) {
        self.set_healthy(domain, true);
        self.set_ping(domain, PingResult::ok(elapsed_ms, payload));
    }

    pub fn set_healthy(&self, domain: &str, healthy: bool) {
        let mut script = self.script();
        if healthy {
            script.healthy.insert(key(domain));
        } else {
            script.healthy.remove(&key(domain));
        }
    }

    pub fn set_ping(&self, domain: &str, result: PingResult) {
        self.script().pings.insert(key(domain), result);
    }

    /// Delay every probe of `domain`.
    pub fn set_delay(&self, domain: &str, delay: Duration) {
        self.script().delays.insert(key(domain), delay);
    }

    /// Health probes received so far.
    pub fn health_calls(&self) -> usize {
        self.script().health_calls
    }

    /// Status probes received so far.
    pub fn ping_calls(&self) -> usize {
        self.script().ping_calls
    }

    async fn delay(&self, node: &Node) {
        let delay = self.script().delays.get(&node.domain).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
    }
}

impl CatalystProber for NullProber {
    async fn check_health(&self, node: &Node) -> HealthReport {
        self.delay(node).await;
        let mut script = self.script();
        script.health_calls += 1;
        if script.healthy.contains(&node.domain) {
            HealthReport {
                services: [("comms".to_string(), HealthStatus::Healthy)].into(),
            }
        } else {
            HealthReport::empty()
        }
    }

    async fn ping(&self, node: &Node, _include_layers: bool) -> PingResult {
        self.delay(node).await;
        let mut script = self.script();
        script.ping_calls += 1;
        script
            .pings
            .get(&node.domain)
            .cloned()
            .unwrap_or_else(PingResult::unreachable)
    }
}
