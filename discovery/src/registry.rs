//! Fallback node registry, consulted when the bootstrap endpoint fails.

use std::future::Future;

use realm_types::Node;

use crate::DiscoveryError;

/// Authoritative list of catalysts (e.g. an on-chain registry contract).
pub trait NodeRegistry: Send + Sync {
    /// Look up every registered catalyst. Domains may be unnormalized.
    fn lookup(&self) -> impl Future<Output = Result<Vec<Node>, DiscoveryError>> + Send;
}

/// Registry backed by a fixed list of domains from configuration.
#[derive(Clone, Debug, Default)]
pub struct StaticRegistry {
    domains: Vec<String>,
}

impl StaticRegistry {
    pub fn new(domains: Vec<String>) -> Self {
        Self { domains }
    }
}

impl NodeRegistry for StaticRegistry {
    async fn lookup(&self) -> Result<Vec<Node>, DiscoveryError> {
        Ok(self
            .domains
            .iter()
            .map(|domain| Node {
                domain: domain.clone(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_registry_returns_configured_domains() {
        let registry = StaticRegistry::new(vec!["a.example.org".into(), "b.example.org".into()]);
        let nodes = registry.lookup().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].domain, "a.example.org");
    }

    #[tokio::test]
    async fn default_registry_is_empty() {
        let registry = StaticRegistry::default();
        assert!(registry.lookup().await.unwrap().is_empty());
    }
}
