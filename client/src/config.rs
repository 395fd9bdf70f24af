//! Realm picker configuration with TOML file support.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use realm_discovery::{DEFAULT_HEALTH_PATH, DEFAULT_STATUS_PATH};
use realm_selection::CROWDED_RADIUS;

use crate::ClientError;

/// Configuration for a realm picker client.
///
/// Can be loaded from a TOML file via [`ClientConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Single catalyst to use, bypassing discovery.
    #[serde(default)]
    pub pinned_node: Option<String>,

    /// Endpoint serving the catalyst list as `[{"domain": ...}]`.
    #[serde(default)]
    pub bootstrap_url: Option<String>,

    /// Catalysts served by the registry fallback.
    #[serde(default)]
    pub fallback_nodes: Vec<String>,

    #[serde(default = "default_health_path")]
    pub health_path: String,

    #[serde(default = "default_status_path")]
    pub status_path: String,

    /// Bound on each health and status probe, in milliseconds.
    #[serde(default = "default_probe_timeout_ms")]
    pub probe_timeout_ms: u64,

    /// Crowded-realm search radius, in parcels.
    #[serde(default = "default_crowded_radius")]
    pub crowded_radius: f64,

    /// Realm string to join at start-up when it is available.
    #[serde(default)]
    pub preferred_realm: Option<String>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_health_path() -> String {
    DEFAULT_HEALTH_PATH.to_string()
}

fn default_status_path() -> String {
    DEFAULT_STATUS_PATH.to_string()
}

fn default_probe_timeout_ms() -> u64 {
    5000
}

fn default_crowded_radius() -> f64 {
    CROWDED_RADIUS
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl ClientConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, ClientError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ClientError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ClientError> {
        let config: Self = toml::from_str(s).map_err(|e| ClientError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> String {
        toml::to_string_pretty(self).expect("ClientConfig is always serializable to TOML")
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_millis(self.probe_timeout_ms)
    }

    /// Reject values no discovery round can work with.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.probe_timeout_ms == 0 {
            return Err(ClientError::Config("probe_timeout_ms must be positive".into()));
        }
        if !self.crowded_radius.is_finite() || self.crowded_radius < 0.0 {
            return Err(ClientError::Config(format!(
                "crowded_radius must be a non-negative number, got {}",
                self.crowded_radius
            )));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            pinned_node: None,
            bootstrap_url: None,
            fallback_nodes: Vec::new(),
            health_path: default_health_path(),
            status_path: default_status_path(),
            probe_timeout_ms: default_probe_timeout_ms(),
            crowded_radius: default_crowded_radius(),
            preferred_realm: None,
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
