//! Scored realm options produced by one discovery round.

use serde::{Deserialize, Serialize};

use crate::{ParcelPosition, PingStatus, Realm};

/// Default capacity of a layer when the status payload omits `maxUsers`.
pub const DEFAULT_MAX_USERS: u32 = 50;

fn default_max_users() -> u32 {
    DEFAULT_MAX_USERS
}

/// A sub-partition of a catalyst with its own capacity.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Layer {
    pub name: String,
    #[serde(default)]
    pub users_count: u32,
    #[serde(default = "default_max_users")]
    pub max_users: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_parcels: Option<Vec<ParcelPosition>>,
}

impl Layer {
    pub fn is_full(&self) -> bool {
        self.users_count >= self.max_users
    }
}

/// Fields shared by both candidate shapes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateBase {
    pub catalyst_name: String,
    pub domain: String,
    pub connection_status: PingStatus,
    pub elapsed_ms: u64,
    pub lighthouse_version: String,
    pub catalyst_version: String,
}

/// One layer of a layer-based catalyst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerCandidate {
    #[serde(flatten)]
    pub base: CandidateBase,
    pub layer: Layer,
    pub score: f64,
}

/// An islands-based catalyst.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IslandsCandidate {
    #[serde(flatten)]
    pub base: CandidateBase,
    pub users_count: u32,
    pub score: f64,
}

/// A probed, scored realm option.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Candidate {
    LayerBased(LayerCandidate),
    IslandsBased(IslandsCandidate),
}

impl Candidate {
    pub fn base(&self) -> &CandidateBase {
        match self {
            Self::LayerBased(c) => &c.base,
            Self::IslandsBased(c) => &c.base,
        }
    }

    pub fn domain(&self) -> &str {
        &self.base().domain
    }

    pub fn catalyst_name(&self) -> &str {
        &self.base().catalyst_name
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.base().elapsed_ms
    }

    pub fn score(&self) -> f64 {
        match self {
            Self::LayerBased(c) => c.score,
            Self::IslandsBased(c) => c.score,
        }
    }

    /// Users on this candidate: the layer occupancy or the islands total.
    pub fn users_count(&self) -> u32 {
        match self {
            Self::LayerBased(c) => c.layer.users_count,
            Self::IslandsBased(c) => c.users_count,
        }
    }

    /// Reachable and, for layers, below capacity.
    pub fn is_selectable(&self) -> bool {
        if self.base().connection_status != PingStatus::Ok {
            return false;
        }
        match self {
            Self::LayerBased(c) => !c.layer.is_full(),
            Self::IslandsBased(_) => true,
        }
    }

    /// The realm a client would join by picking this candidate.
    pub fn to_realm(&self) -> Realm {
        let base = self.base();
        let layer = match self {
            Self::LayerBased(c) => Some(c.layer.name.clone()),
            Self::IslandsBased(_) => None,
        };
        Realm {
            catalyst_name: base.catalyst_name.clone(),
            domain: base.domain.clone(),
            layer,
            lighthouse_version: base.lighthouse_version.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(name: &str) -> CandidateBase {
        CandidateBase {
            catalyst_name: name.into(),
            domain: format!("https://{name}.example.org"),
            connection_status: PingStatus::Ok,
            elapsed_ms: 100,
            lighthouse_version: "1.0.0".into(),
            catalyst_version: "3.0.0".into(),
        }
    }

    fn layer_candidate(users: u32, max: u32) -> Candidate {
        Candidate::LayerBased(LayerCandidate {
            base: base("alpha"),
            layer: Layer {
                name: "blue".into(),
                users_count: users,
                max_users: max,
                users_parcels: None,
            },
            score: 0.0,
        })
    }

    #[test]
    fn full_layer_is_not_selectable() {
        assert!(!layer_candidate(50, 50).is_selectable());
        assert!(!layer_candidate(51, 50).is_selectable());
        assert!(layer_candidate(49, 50).is_selectable());
    }

    #[test]
    fn unreachable_candidate_is_not_selectable() {
        let mut candidate = IslandsCandidate {
            base: base("beta"),
            users_count: 3,
            score: 103.0,
        };
        candidate.base.connection_status = PingStatus::Unreachable;
        assert!(!Candidate::IslandsBased(candidate).is_selectable());
    }

    #[test]
    fn layer_realm_carries_layer_name() {
        let realm = layer_candidate(1, 50).to_realm();
        assert_eq!(realm.layer.as_deref(), Some("blue"));
        assert_eq!(realm.catalyst_name, "alpha");
    }

    #[test]
    fn islands_realm_omits_layer() {
        let candidate = Candidate::IslandsBased(IslandsCandidate {
            base: base("beta"),
            users_count: 3,
            score: 103.0,
        });
        assert_eq!(candidate.to_realm().layer, None);
        assert_eq!(candidate.users_count(), 3);
    }

    #[test]
    fn serializes_with_type_tag() {
        let json = serde_json::to_value(layer_candidate(1, 50)).unwrap();
        assert_eq!(json["type"], "layer-based");
        assert_eq!(json["catalystName"], "alpha");
        assert_eq!(json["layer"]["name"], "blue");
    }
}
