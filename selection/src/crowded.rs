//! Migration towards the realm where the most users are near the player.

use realm_types::{Candidate, ParcelPosition, Realm};

/// Default search radius around the player, in grid units.
pub const CROWDED_RADIUS: f64 = 4.0;

/// Number of parcels within `radius` (inclusive) of `origin`.
pub fn count_close_parcels(origin: &ParcelPosition, parcels: &[ParcelPosition], radius: f64) -> usize {
    parcels
        .iter()
        .filter(|parcel| origin.distance_to(parcel) <= radius)
        .count()
}

/// Decision of one crowded-realm check.
#[derive(Clone, Debug, PartialEq)]
pub struct CrowdedOutcome {
    /// Whether `realm` differs from the realm the check started from.
    pub changed: bool,
    pub realm: Realm,
    /// Peers near the player in `realm`, excluding the player.
    pub close_peers: i64,
}

/// Finds the layer with the most users around the player's position.
pub struct CrowdedRealmFinder {
    radius: f64,
}

impl CrowdedRealmFinder {
    pub fn new(radius: f64) -> Self {
        Self { radius }
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Evaluate `candidates` against the player at `position` in `current`.
    ///
    /// Only layer-based candidates that report user positions and still have
    /// room are considered. The player is not counted in their own realm. The
    /// current realm leads with zero peers; a candidate must strictly exceed
    /// the leader to take over.
    pub fn find(
        &self,
        current: &Realm,
        position: ParcelPosition,
        candidates: &[Candidate],
    ) -> CrowdedOutcome {
        let mut leader = current.clone();
        let mut leader_peers: i64 = 0;

        for candidate in candidates {
            let Candidate::LayerBased(lc) = candidate else {
                continue;
            };
            let Some(parcels) = lc.layer.users_parcels.as_deref() else {
                continue;
            };
            if parcels.is_empty() || lc.layer.is_full() {
                continue;
            }

            let realm = candidate.to_realm();
            let mut peers = count_close_parcels(&position, parcels, self.radius) as i64;
            if realm.realm_string() == current.realm_string() {
                peers -= 1;
            }

            tracing::trace!(realm = %realm, peers, "crowded realm candidate");
            if peers > leader_peers {
                leader = realm;
                leader_peers = peers;
            }
        }

        CrowdedOutcome {
            changed: leader != *current,
            realm: leader,
            close_peers: leader_peers,
        }
    }
}

impl Default for CrowdedRealmFinder {
    fn default() -> Self {
        Self::new(CROWDED_RADIUS)
    }
}
