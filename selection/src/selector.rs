//! Picks the single best realm from one round's candidates.

use std::cmp::Ordering;
use std::collections::HashMap;

use realm_types::{Candidate, Realm, RealmString};

use crate::SelectionError;

/// Latency gap above which the faster candidate wins outright.
pub const LATENCY_DOMINANCE_MS: u64 = 1500;

/// Total users per domain, summed over every candidate of the round
/// (a layered catalyst contributes all of its layers).
pub fn users_by_domain(candidates: &[Candidate]) -> HashMap<&str, u64> {
    let mut totals: HashMap<&str, u64> = HashMap::new();
    for candidate in candidates {
        *totals.entry(candidate.domain()).or_default() += u64::from(candidate.users_count());
    }
    totals
}

/// Filters and ranks candidates with a deterministic tie-break cascade.
///
/// Ordering tiers, each consulted only when the previous one ties:
/// 1. latency, when the two candidates differ by more than the dominance gap
/// 2. score, higher first
/// 3. total users on the candidate's domain, fewer first
/// 4. latency
pub struct RealmSelector {
    latency_gap_ms: u64,
}

impl RealmSelector {
    pub fn new() -> Self {
        Self {
            latency_gap_ms: LATENCY_DOMINANCE_MS,
        }
    }

    pub fn with_latency_gap(latency_gap_ms: u64) -> Self {
        Self { latency_gap_ms }
    }

    /// Compare two candidates; `Less` means `a` is preferred.
    pub fn compare(
        &self,
        a: &Candidate,
        b: &Candidate,
        users_by_domain: &HashMap<&str, u64>,
    ) -> Ordering {
        let (ea, eb) = (a.elapsed_ms(), b.elapsed_ms());
        if ea.abs_diff(eb) > self.latency_gap_ms {
            return ea.cmp(&eb);
        }

        let by_score = b.score().partial_cmp(&a.score()).unwrap_or(Ordering::Equal);
        if by_score != Ordering::Equal {
            return by_score;
        }

        let ua = users_by_domain.get(a.domain()).copied().unwrap_or(0);
        let ub = users_by_domain.get(b.domain()).copied().unwrap_or(0);
        ua.cmp(&ub).then(ea.cmp(&eb))
    }

    /// The best selectable candidate.
    ///
    /// The latency tier is a threshold, so the ordering is not transitive.
    /// Selection is one pass in input order in which a challenger replaces
    /// the leader only when strictly preferred.
    pub fn select<'a>(&self, candidates: &'a [Candidate]) -> Result<&'a Candidate, SelectionError> {
        if candidates.is_empty() {
            return Err(SelectionError::NoCandidates);
        }

        let users = users_by_domain(candidates);
        let mut eligible = candidates.iter().filter(|c| c.is_selectable());

        let Some(first) = eligible.next() else {
            tracing::warn!(
                candidates = candidates.len(),
                "no candidate is reachable with free capacity"
            );
            return Err(SelectionError::NoRealmAvailable {
                candidates: candidates.len(),
            });
        };

        let best = eligible.fold(first, |leader, challenger| {
            if self.compare(challenger, leader, &users) == Ordering::Less {
                challenger
            } else {
                leader
            }
        });

        tracing::debug!(
            domain = %best.domain(),
            score = best.score(),
            elapsed_ms = best.elapsed_ms(),
            "selected best candidate"
        );
        Ok(best)
    }

    /// The realm of the best selectable candidate.
    pub fn pick_realm(&self, candidates: &[Candidate]) -> Result<Realm, SelectionError> {
        self.select(candidates).map(Candidate::to_realm)
    }
}

impl Default for RealmSelector {
    fn default() -> Self {
        Self::new()
    }
}

/// Find the realm named by `realm` among `candidates`.
///
/// A bare catalyst name matches the islands-based candidate of that catalyst;
/// `name-layer` matches the layer-based candidate for that layer. The match
/// must be selectable.
pub fn resolve_realm(realm: &RealmString, candidates: &[Candidate]) -> Result<Realm, SelectionError> {
    let found = candidates.iter().find(|c| {
        c.catalyst_name() == realm.catalyst_name
            && match (c, realm.layer.as_deref()) {
                (Candidate::LayerBased(lc), Some(layer)) => lc.layer.name == layer,
                (Candidate::IslandsBased(_), None) => true,
                _ => false,
            }
    });

    let Some(candidate) = found else {
        return Err(SelectionError::UnknownRealm(realm.to_string()));
    };
    if candidate.is_selectable() {
        return Ok(candidate.to_realm());
    }
    match candidate {
        Candidate::LayerBased(lc) if lc.layer.is_full() => {
            Err(SelectionError::RealmFull(realm.to_string()))
        }
        _ => Err(SelectionError::Unreachable(realm.to_string())),
    }
}
