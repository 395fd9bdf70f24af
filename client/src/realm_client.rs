//! Discovery, selection and migration wired to the shared realm state.

use std::collections::HashSet;
use std::sync::Arc;

use realm_discovery::{
    CatalystClient, CatalystProber, DiscoveryRound, NodeRegistry, NodeSource, RoundOutcome,
    StaticRegistry,
};
use realm_selection::{resolve_realm, CrowdedRealmFinder, RealmSelector};
use realm_types::{Candidate, Node, ParcelPosition, Realm, RealmString};

use crate::config::ClientConfig;
use crate::metrics::DiscoveryMetrics;
use crate::state::RealmStore;
use crate::ClientError;

/// Picks the realm a client joins and keeps the choice current.
///
/// Every result goes through the [`RealmStore`]: each round's candidates are
/// published as one snapshot, and realms are published with
/// compare-and-publish so consumers only see real changes.
pub struct RealmClient<P, R> {
    store: Arc<RealmStore>,
    source: NodeSource<R>,
    round: DiscoveryRound<P>,
    selector: RealmSelector,
    finder: CrowdedRealmFinder,
    metrics: Arc<DiscoveryMetrics>,
    preferred_realm: Option<RealmString>,
}

impl RealmClient<CatalystClient, StaticRegistry> {
    /// Build a client that probes catalysts over HTTP.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;

        let prober = CatalystClient::with_timeout(config.probe_timeout())
            .with_paths(&config.health_path, &config.status_path);
        let source = NodeSource::new(StaticRegistry::new(config.fallback_nodes.clone()))
            .with_pinned_node(config.pinned_node.clone())
            .with_bootstrap_url(config.bootstrap_url.clone());
        let preferred_realm = config
            .preferred_realm
            .as_deref()
            .map(str::parse::<RealmString>)
            .transpose()?;

        Ok(RealmClient::new(source, prober)
            .with_finder(CrowdedRealmFinder::new(config.crowded_radius))
            .with_preferred_realm(preferred_realm))
    }
}

impl<P: CatalystProber, R: NodeRegistry> RealmClient<P, R> {
    pub fn new(source: NodeSource<R>, prober: P) -> Self {
        Self {
            store: Arc::new(RealmStore::new()),
            source,
            round: DiscoveryRound::new(prober),
            selector: RealmSelector::default(),
            finder: CrowdedRealmFinder::default(),
            metrics: Arc::new(DiscoveryMetrics::new()),
            preferred_realm: None,
        }
    }

    /// Publish into an existing store instead of a private one.
    pub fn with_store(mut self, store: Arc<RealmStore>) -> Self {
        self.store = store;
        self
    }

    pub fn with_selector(mut self, selector: RealmSelector) -> Self {
        self.selector = selector;
        self
    }

    pub fn with_finder(mut self, finder: CrowdedRealmFinder) -> Self {
        self.finder = finder;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<DiscoveryMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Realm to join at start-up when it resolves against the first round.
    pub fn with_preferred_realm(mut self, realm: Option<RealmString>) -> Self {
        self.preferred_realm = realm;
        self
    }

    pub fn store(&self) -> &Arc<RealmStore> {
        &self.store
    }

    pub fn metrics(&self) -> &Arc<DiscoveryMetrics> {
        &self.metrics
    }

    pub fn prober(&self) -> &P {
        self.round.prober()
    }

    /// Run a full discovery round and publish its candidates.
    ///
    /// Fails only when no nodes could be resolved; in that case nothing is
    /// published.
    pub async fn discover(&self) -> Result<Vec<Candidate>, ClientError> {
        let nodes = match self.source.fetch_nodes().await {
            Ok(nodes) => nodes,
            Err(e) => {
                self.metrics.discovery_failures.inc();
                tracing::error!(error = %e, "discovery failed");
                return Err(e.into());
            }
        };

        self.metrics.health_probes.inc_by(nodes.len() as u64);
        let outcome = self.round.run(&nodes).await;
        Ok(self.publish_round(outcome))
    }

    /// Discover, then publish the initial realm.
    ///
    /// The preferred realm wins when it is present in the round and
    /// selectable; otherwise the selector's pick is used.
    pub async fn select_initial_realm(&self) -> Result<Realm, ClientError> {
        let candidates = self.discover().await?;

        if let Some(preferred) = &self.preferred_realm {
            match resolve_realm(preferred, &candidates) {
                Ok(realm) => {
                    tracing::info!(realm = %realm, "joining preferred realm");
                    self.metrics.selections.inc();
                    self.publish_realm(realm.clone());
                    return Ok(realm);
                }
                Err(e) => {
                    tracing::warn!(realm = %preferred, error = %e, "preferred realm unavailable, selecting best candidate");
                }
            }
        }

        let realm = self.pick(&candidates)?;
        self.publish_realm(realm.clone());
        Ok(realm)
    }

    /// Switch to the realm named by `realm_string`.
    ///
    /// Known domains are re-probed first so the decision uses fresh
    /// occupancy. Fails with `UnknownRealm` when no candidate matches and
    /// `RealmFull` when the matched layer is full.
    pub async fn change_realm(&self, realm_string: &str) -> Result<Realm, ClientError> {
        let wanted: RealmString = realm_string.parse()?;
        let candidates = self.refresh_candidates().await?;
        let realm = resolve_realm(&wanted, &candidates)?;
        self.metrics.selections.inc();
        self.publish_realm(realm.clone());
        Ok(realm)
    }

    /// Move to the realm with the most users near `position`, if it is not
    /// the current one.
    ///
    /// Re-probes every domain of the latest published candidates. After a
    /// migration, resolves only once the session layer reports the new realm
    /// connected, and fails with the reported status otherwise. Returns
    /// whether the realm changed, and the realm the client ends up in.
    pub async fn change_to_crowded_realm(
        &self,
        position: ParcelPosition,
    ) -> Result<(bool, Realm), ClientError> {
        let current = self.store.current_realm().ok_or(ClientError::NotInitialized)?;

        let mut nodes = self.known_nodes()?;
        if nodes.is_empty() {
            nodes.push(Node::new(&current.domain)?);
        }
        let outcome = self.round.reprobe(&nodes).await;
        let candidates = self.publish_round(outcome);

        let decision = self.finder.find(&current, position, &candidates);
        if !decision.changed {
            tracing::debug!(realm = %current, "no busier realm nearby");
            return Ok((false, current));
        }

        tracing::info!(
            from = %current,
            to = %decision.realm,
            close_peers = decision.close_peers,
            "migrating to crowded realm"
        );
        self.metrics.migrations.inc();
        self.publish_realm(decision.realm);
        let realm = self.store.wait_until_connected().await?;
        Ok((true, realm))
    }

    /// Re-probe the known domains, or run a full round when none are known.
    async fn refresh_candidates(&self) -> Result<Vec<Candidate>, ClientError> {
        let nodes = self.known_nodes()?;
        if nodes.is_empty() {
            return self.discover().await;
        }
        let outcome = self.round.reprobe(&nodes).await;
        Ok(self.publish_round(outcome))
    }

    /// Distinct domains of the latest published candidates.
    fn known_nodes(&self) -> Result<Vec<Node>, ClientError> {
        let mut seen = HashSet::new();
        let mut nodes = Vec::new();
        for candidate in self.store.candidates() {
            if seen.insert(candidate.domain().to_string()) {
                nodes.push(Node::new(candidate.domain())?);
            }
        }
        Ok(nodes)
    }

    fn publish_round(&self, outcome: RoundOutcome) -> Vec<Candidate> {
        self.metrics.record_round(&outcome);
        self.store.publish_candidates(outcome.candidates.clone());
        outcome.candidates
    }

    fn pick(&self, candidates: &[Candidate]) -> Result<Realm, ClientError> {
        let realm = self.selector.pick_realm(candidates).map_err(|e| {
            self.metrics.selection_failures.inc();
            tracing::error!(error = %e, candidates = candidates.len(), "no realm selected");
            ClientError::from(e)
        })?;
        self.metrics.selections.inc();
        Ok(realm)
    }

    fn publish_realm(&self, realm: Realm) -> bool {
        let changed = self.store.publish_realm(realm);
        if changed {
            self.metrics.realm_changes.inc();
        }
        changed
    }
}
