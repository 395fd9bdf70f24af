//! Connection status reported by the session subsystem.

use serde::{Deserialize, Serialize};
use std::fmt;

/// State of the connection to the currently published realm.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConnectionStatus {
    #[default]
    Connecting,
    Connected,
    Error,
    RealmFull,
}

impl ConnectionStatus {
    /// Whether this status ends a pending "wait until connected" with a rejection.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::RealmFull)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Connected => "connected",
            Self::Error => "error",
            Self::RealmFull => "realm-full",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
