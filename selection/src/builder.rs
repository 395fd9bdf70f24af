//! Turns raw probe results into typed, scored candidates.

use realm_types::{
    Candidate, CandidateBase, IslandsCandidate, LayerCandidate, Node, PingResult, PingStatus,
    StatusPayload,
};

use crate::score::{islands_score, layer_score};

/// Build the candidates of one round.
///
/// A node whose payload lists `layers` yields one layer-based candidate per
/// layer; any other reachable node yields a single islands-based candidate.
/// Unreachable nodes and empty results yield nothing.
pub fn build_candidates(results: &[(Node, PingResult)]) -> Vec<Candidate> {
    let mut candidates = Vec::new();

    for (node, result) in results {
        if !result.is_ok() {
            continue;
        }
        let (Some(elapsed), Some(payload)) = (result.elapsed, result.payload.as_ref()) else {
            continue;
        };
        candidates.extend(candidates_for(node, elapsed, payload));
    }

    candidates
}

fn candidates_for(node: &Node, elapsed_ms: u64, payload: &StatusPayload) -> Vec<Candidate> {
    let base = CandidateBase {
        catalyst_name: payload.name.clone(),
        domain: node.domain.clone(),
        connection_status: PingStatus::Ok,
        elapsed_ms,
        lighthouse_version: payload.version.clone(),
        catalyst_version: payload.env.catalyst_version.clone(),
    };

    match &payload.layers {
        Some(layers) => layers
            .iter()
            .map(|layer| {
                Candidate::LayerBased(LayerCandidate {
                    base: base.clone(),
                    score: layer_score(layer.users_count, layer.max_users),
                    layer: layer.clone(),
                })
            })
            .collect(),
        None => {
            let users_count = payload.users_count.unwrap_or(0);
            vec![Candidate::IslandsBased(IslandsCandidate {
                base,
                users_count,
                score: islands_score(users_count),
            })]
        }
    }
}
