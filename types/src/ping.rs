//! Status probe results and the catalyst status payload.

use serde::{Deserialize, Serialize};

use crate::Layer;

/// Outcome class of one status probe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PingStatus {
    Ok,
    Unreachable,
}

/// The environment block of a status payload.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusEnv {
    #[serde(default)]
    pub catalyst_version: String,
}

/// Parsed body of `GET {domain}/{status_path}`.
///
/// The presence of `layers` marks a layer-based catalyst; otherwise the
/// top-level `usersCount` describes an islands-based one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusPayload {
    pub name: String,
    /// Lighthouse (comms server) version.
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub env: StatusEnv,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layers: Option<Vec<Layer>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub users_count: Option<u32>,
}

/// Result of probing one node's status endpoint. Immutable once captured.
///
/// A result with no status is the "empty" result produced when a 200
/// response carried an unparseable body.
#[derive(Clone, Debug, PartialEq)]
pub struct PingResult {
    pub status: Option<PingStatus>,
    /// Round-trip time in milliseconds.
    pub elapsed: Option<u64>,
    pub payload: Option<StatusPayload>,
}

impl PingResult {
    pub fn ok(elapsed: u64, payload: StatusPayload) -> Self {
        Self {
            status: Some(PingStatus::Ok),
            elapsed: Some(elapsed),
            payload: Some(payload),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            status: Some(PingStatus::Unreachable),
            elapsed: None,
            payload: None,
        }
    }

    pub fn empty() -> Self {
        Self {
            status: None,
            elapsed: None,
            payload: None,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Some(PingStatus::Ok)
    }
}
