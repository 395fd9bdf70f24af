//! Candidate desirability scores. Higher is better.

use std::f64::consts::PI;

/// Scale of every score.
pub const SCORE_BASE: f64 = 50.0;

/// Phase offset of the layer occupancy curve.
const LAYER_PHASE: f64 = -PI / 1.8;

/// Score of a layer with `users_count` users out of `max_users`.
///
/// Empty layers score `-SCORE_BASE`, full ones `-10 * SCORE_BASE`. In between
/// the score follows a raised cosine that peaks at moderate occupancy (about
/// 37% of capacity), so near-empty and near-full layers are both avoided.
pub fn layer_score(users_count: u32, max_users: u32) -> f64 {
    if users_count == 0 {
        return -SCORE_BASE;
    }
    if users_count >= max_users {
        return -10.0 * SCORE_BASE;
    }
    let period = PI / (0.67 * f64::from(max_users));
    SCORE_BASE + SCORE_BASE * (LAYER_PHASE + period * f64::from(users_count)).cos()
}

/// Score of an islands-based catalyst with `users_count` users.
///
/// An empty islands catalyst scores just above an empty layer; otherwise more
/// users is strictly better.
pub fn islands_score(users_count: u32) -> f64 {
    if users_count == 0 {
        return -SCORE_BASE + 1.0;
    }
    100.0 + f64::from(users_count)
}
