//! Nullable node registry: a fixed answer, or a failure.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use realm_discovery::{DiscoveryError, NodeRegistry};
use realm_types::Node;

/// A registry that returns a fixed node list without any lookup.
#[derive(Clone, Default)]
pub struct NullRegistry {
    domains: Vec<String>,
    failing: bool,
    lookups: Arc<AtomicUsize>,
}

impl NullRegistry {
    pub fn new(domains: &[&str]) -> Self {
        Self {
            domains: domains.iter().map(|d| d.to_string()).collect(),
            ..Default::default()
        }
    }

    /// A registry whose every lookup fails.
    pub fn failing() -> Self {
        Self {
            failing: true,
            ..Default::default()
        }
    }

    /// Lookups served so far, across clones.
    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl NodeRegistry for NullRegistry {
    async fn lookup(&self) -> Result<Vec<Node>, DiscoveryError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(DiscoveryError::Registry("null registry configured to fail".into()));
        }
        Ok(self
            .domains
            .iter()
            .map(|domain| Node {
                domain: domain.clone(),
            })
            .collect())
    }
}
