//! Status payload fixtures.

use realm_types::{Layer, ParcelPosition, StatusEnv, StatusPayload};

/// A layer with `users_count` of `max_users` occupied and no user positions.
pub fn layer(name: &str, users_count: u32, max_users: u32) -> Layer {
    Layer {
        name: name.to_string(),
        users_count,
        max_users,
        users_parcels: None,
    }
}

/// Add user positions to `layer`; `users_count` follows the parcel count.
pub fn with_parcels(mut layer: Layer, parcels: &[(i32, i32)]) -> Layer {
    layer.users_count = parcels.len() as u32;
    layer.users_parcels = Some(
        parcels
            .iter()
            .map(|&(x, y)| ParcelPosition::new(x, y))
            .collect(),
    );
    layer
}

/// Status of a layer-based catalyst.
pub fn layered_status(name: &str, layers: Vec<Layer>) -> StatusPayload {
    StatusPayload {
        name: name.to_string(),
        version: "1.0.0".to_string(),
        env: StatusEnv {
            catalyst_version: "3.0.0".to_string(),
        },
        layers: Some(layers),
        users_count: None,
    }
}

/// Status of an islands-based catalyst.
pub fn islands_status(name: &str, users_count: u32) -> StatusPayload {
    StatusPayload {
        name: name.to_string(),
        version: "2.0.0".to_string(),
        env: StatusEnv {
            catalyst_version: "4.0.0".to_string(),
        },
        layers: None,
        users_count: Some(users_count),
    }
}
