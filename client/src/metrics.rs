//! Prometheus metrics for discovery and realm selection.
//!
//! [`DiscoveryMetrics`] owns a dedicated [`Registry`] that callers can encode
//! into the Prometheus text exposition format.

use prometheus::{
    register_histogram_with_registry, register_int_counter_with_registry,
    register_int_gauge_with_registry, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge,
    Opts, Registry, TextEncoder,
};

use realm_discovery::RoundOutcome;

use crate::ClientError;

pub struct DiscoveryMetrics {
    pub registry: Registry,

    // ── Counters ────────────────────────────────────────────────────────
    /// Completed discovery rounds, including re-probes.
    pub rounds: IntCounter,
    /// Health probes sent.
    pub health_probes: IntCounter,
    /// Nodes whose health probe failed.
    pub unhealthy_nodes: IntCounter,
    /// Status probes sent.
    pub status_probes: IntCounter,
    /// Healthy nodes whose status probe failed.
    pub unreachable_nodes: IntCounter,
    /// Rounds that ended without any node to probe.
    pub discovery_failures: IntCounter,
    /// Realms chosen by selection or by name.
    pub selections: IntCounter,
    /// Selections that found no selectable candidate.
    pub selection_failures: IntCounter,
    /// Moves to a crowded realm.
    pub migrations: IntCounter,
    /// Realm publications that changed the current realm.
    pub realm_changes: IntCounter,

    // ── Gauges ──────────────────────────────────────────────────────────
    /// Candidates produced by the latest round.
    pub candidates: IntGauge,

    // ── Histograms ──────────────────────────────────────────────────────
    /// Status probe round-trip time of reachable nodes, in milliseconds.
    pub probe_latency_ms: Histogram,
}

impl DiscoveryMetrics {
    pub fn new() -> Self {
        let registry = Registry::new();

        let rounds = register_int_counter_with_registry!(
            Opts::new("realm_discovery_rounds_total", "Completed discovery rounds"),
            registry
        )
        .expect("failed to register rounds counter");

        let health_probes = register_int_counter_with_registry!(
            Opts::new("realm_health_probes_total", "Health probes sent"),
            registry
        )
        .expect("failed to register health_probes counter");

        let status_probes = register_int_counter_with_registry!(
            Opts::new("realm_status_probes_total", "Status probes sent"),
            registry
        )
        .expect("failed to register status_probes counter");

        let unhealthy_nodes = register_int_counter_with_registry!(
            Opts::new(
                "realm_unhealthy_nodes_total",
                "Nodes excluded by the health probe"
            ),
            registry
        )
        .expect("failed to register unhealthy_nodes counter");

        let unreachable_nodes = register_int_counter_with_registry!(
            Opts::new(
                "realm_unreachable_nodes_total",
                "Healthy nodes whose status probe failed"
            ),
            registry
        )
        .expect("failed to register unreachable_nodes counter");

        let discovery_failures = register_int_counter_with_registry!(
            Opts::new(
                "realm_discovery_failures_total",
                "Rounds that found no nodes to probe"
            ),
            registry
        )
        .expect("failed to register discovery_failures counter");

        let selections = register_int_counter_with_registry!(
            Opts::new("realm_selections_total", "Realms chosen by selection or by name"),
            registry
        )
        .expect("failed to register selections counter");

        let migrations = register_int_counter_with_registry!(
            Opts::new("realm_migrations_total", "Moves to a crowded realm"),
            registry
        )
        .expect("failed to register migrations counter");

        let selection_failures = register_int_counter_with_registry!(
            Opts::new(
                "realm_selection_failures_total",
                "Selections without a selectable candidate"
            ),
            registry
        )
        .expect("failed to register selection_failures counter");

        let realm_changes = register_int_counter_with_registry!(
            Opts::new("realm_changes_total", "Changes of the published realm"),
            registry
        )
        .expect("failed to register realm_changes counter");

        let candidates = register_int_gauge_with_registry!(
            Opts::new("realm_candidates", "Candidates produced by the latest round"),
            registry
        )
        .expect("failed to register candidates gauge");

        // 5 ms → ~20 s
        let probe_latency_ms = register_histogram_with_registry!(
            HistogramOpts::new(
                "realm_probe_latency_ms",
                "Status probe round-trip time in milliseconds"
            )
            .buckets(prometheus::exponential_buckets(5.0, 2.0, 13).unwrap()),
            registry
        )
        .expect("failed to register probe_latency_ms histogram");

        Self {
            registry,
            rounds,
            health_probes,
            unhealthy_nodes,
            status_probes,
            unreachable_nodes,
            discovery_failures,
            selections,
            selection_failures,
            migrations,
            realm_changes,
            candidates,
            probe_latency_ms,
        }
    }

    /// Account for one completed round. Health probes are counted by the
    /// caller, since a re-probe sends none.
    pub fn record_round(&self, outcome: &RoundOutcome) {
        self.rounds.inc();
        self.status_probes.inc_by(outcome.healthy as u64);
        self.unhealthy_nodes
            .inc_by(outcome.nodes.saturating_sub(outcome.healthy) as u64);
        self.unreachable_nodes
            .inc_by(outcome.healthy.saturating_sub(outcome.reachable) as u64);
        self.candidates.set(outcome.candidates.len() as i64);
        for latency in &outcome.latencies_ms {
            self.probe_latency_ms.observe(*latency as f64);
        }
    }

    /// Render every metric in the Prometheus text format.
    pub fn encode(&self) -> Result<String, ClientError> {
        let mut buffer = Vec::new();
        TextEncoder::new()
            .encode(&self.registry.gather(), &mut buffer)
            .map_err(|e| ClientError::Metrics(e.to_string()))?;
        String::from_utf8(buffer).map_err(|e| ClientError::Metrics(e.to_string()))
    }
}

impl Default for DiscoveryMetrics {
    fn default() -> Self {
        Self::new()
    }
}
