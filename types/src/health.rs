//! Health classification of a catalyst.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Reported state of one catalyst sub-service.
///
/// Anything other than `"HEALTHY"` (`"UNHEALTHY"`, `"DOWN"`, `"LOADING"`, ...)
/// deserializes as [`HealthStatus::Unhealthy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthStatus {
    Healthy,
    #[serde(other)]
    Unhealthy,
}

/// Result of one health probe: the per-sub-service status map.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HealthReport {
    pub services: BTreeMap<String, HealthStatus>,
}

impl HealthReport {
    /// Report used for timeouts and transport errors.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Healthy iff at least one sub-service reported and all of them are healthy.
    pub fn is_healthy(&self) -> bool {
        !self.services.is_empty()
            && self
                .services
                .values()
                .all(|status| *status == HealthStatus::Healthy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_healthy_services_is_healthy() {
        let report: HealthReport =
            serde_json::from_str(r#"{"comms":"HEALTHY","content":"HEALTHY"}"#).unwrap();
        assert!(report.is_healthy());
    }

    #[test]
    fn one_unhealthy_service_fails_the_node() {
        let report: HealthReport =
            serde_json::from_str(r#"{"comms":"HEALTHY","lambdas":"UNHEALTHY"}"#).unwrap();
        assert!(!report.is_healthy());
    }

    #[test]
    fn unknown_status_string_is_unhealthy() {
        let report: HealthReport = serde_json::from_str(r#"{"content":"LOADING"}"#).unwrap();
        assert_eq!(report.services["content"], HealthStatus::Unhealthy);
        assert!(!report.is_healthy());
    }

    #[test]
    fn empty_report_is_unhealthy() {
        assert!(!HealthReport::empty().is_healthy());
    }
}
