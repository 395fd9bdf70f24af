//! One discovery round: parallel health fan-out, parallel status fan-out,
//! candidate building.

use futures_util::future::join_all;

use realm_selection::build_candidates;
use realm_types::{Candidate, Node, PingResult};

use crate::prober::CatalystProber;

/// Everything one round produced.
///
/// The candidate list is a complete snapshot of the round; nothing from
/// earlier rounds is merged in.
#[derive(Clone, Debug, Default)]
pub struct RoundOutcome {
    /// Nodes the round started from.
    pub nodes: usize,
    /// Nodes that passed the health probe.
    pub healthy: usize,
    /// Nodes whose status probe came back OK.
    pub reachable: usize,
    /// Status round-trip time of each reachable node.
    pub latencies_ms: Vec<u64>,
    pub candidates: Vec<Candidate>,
}

/// Runs discovery rounds against a [`CatalystProber`].
///
/// Every probe of a fan-out runs concurrently and the fan-out completes only
/// once all of them have settled; each probe is bounded by the prober's own
/// timeout.
pub struct DiscoveryRound<P> {
    prober: P,
}

impl<P: CatalystProber> DiscoveryRound<P> {
    pub fn new(prober: P) -> Self {
        Self { prober }
    }

    pub fn prober(&self) -> &P {
        &self.prober
    }

    /// Health-check `nodes`, then status-probe the healthy ones.
    pub async fn run(&self, nodes: &[Node]) -> RoundOutcome {
        let reports = join_all(nodes.iter().map(|node| self.prober.check_health(node))).await;

        let healthy: Vec<Node> = nodes
            .iter()
            .zip(reports)
            .filter_map(|(node, report)| {
                if report.is_healthy() {
                    Some(node.clone())
                } else {
                    tracing::debug!(domain = %node, "excluding unhealthy node");
                    None
                }
            })
            .collect();

        let mut outcome = self.reprobe(&healthy).await;
        outcome.nodes = nodes.len();

        tracing::info!(
            nodes = outcome.nodes,
            healthy = outcome.healthy,
            reachable = outcome.reachable,
            candidates = outcome.candidates.len(),
            "discovery round completed"
        );
        outcome
    }

    /// Status-probe `nodes` directly, skipping the health fan-out.
    pub async fn reprobe(&self, nodes: &[Node]) -> RoundOutcome {
        // Layer details are always requested; the crowded-realm finder
        // needs the user parcels.
        let pings = join_all(nodes.iter().map(|node| self.prober.ping(node, true))).await;

        let results: Vec<(Node, PingResult)> = nodes.iter().cloned().zip(pings).collect();
        let latencies_ms: Vec<u64> = results
            .iter()
            .filter(|(_, result)| result.is_ok())
            .filter_map(|(_, result)| result.elapsed)
            .collect();

        RoundOutcome {
            nodes: nodes.len(),
            healthy: nodes.len(),
            reachable: latencies_ms.len(),
            latencies_ms,
            candidates: build_candidates(&results),
        }
    }
}
