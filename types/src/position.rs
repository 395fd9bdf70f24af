//! Grid positions in the shared world.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Edge length of one parcel in world units.
pub const PARCEL_SIZE: f64 = 16.0;

/// A parcel coordinate on the world grid.
///
/// Serialized as a two-element array `[x, y]`, matching the `usersParcels`
/// field of a catalyst status payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct ParcelPosition {
    pub x: i32,
    pub y: i32,
}

impl ParcelPosition {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Convert a world-space position (horizontal plane `x`/`z`) to its parcel.
    pub fn from_world(x: f64, z: f64) -> Self {
        Self {
            x: (x / PARCEL_SIZE).floor() as i32,
            y: (z / PARCEL_SIZE).floor() as i32,
        }
    }

    /// Euclidean distance in grid units.
    pub fn distance_to(&self, other: &ParcelPosition) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<[i32; 2]> for ParcelPosition {
    fn from([x, y]: [i32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<ParcelPosition> for [i32; 2] {
    fn from(p: ParcelPosition) -> Self {
        [p.x, p.y]
    }
}

impl fmt::Display for ParcelPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}
