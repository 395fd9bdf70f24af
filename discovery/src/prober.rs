//! The probing seam between a discovery round and the network.

use std::future::Future;

use realm_types::{HealthReport, Node, PingResult};

/// Issues the per-node health and status requests of a discovery round.
///
/// Implementations never fail: timeouts and transport errors are folded into
/// the returned value (an empty report, an unreachable ping).
pub trait CatalystProber: Send + Sync {
    /// Health-check one node.
    fn check_health(&self, node: &Node) -> impl Future<Output = HealthReport> + Send;

    /// Measure latency to one node and fetch its status payload.
    fn ping(&self, node: &Node, include_layers: bool) -> impl Future<Output = PingResult> + Send;
}
