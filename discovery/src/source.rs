//! Resolution of the candidate node list for a discovery round.

use std::collections::HashSet;
use std::time::Duration;

use realm_types::Node;

use crate::registry::NodeRegistry;
use crate::DiscoveryError;

/// Default timeout for the bootstrap node-list request.
const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves the nodes to probe, in priority order:
/// 1. a pinned node, which bypasses discovery entirely
/// 2. the bootstrap endpoint (`GET {bootstrap_url}` -> `[{"domain": ...}]`)
/// 3. the registry fallback
///
/// Domains are normalized and deduplicated, keeping first occurrence order.
pub struct NodeSource<R> {
    pinned_node: Option<String>,
    bootstrap_url: Option<String>,
    http_client: reqwest::Client,
    bootstrap_timeout: Duration,
    registry: R,
}

impl<R: NodeRegistry> NodeSource<R> {
    pub fn new(registry: R) -> Self {
        Self {
            pinned_node: None,
            bootstrap_url: None,
            http_client: reqwest::Client::new(),
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
            registry,
        }
    }

    /// Always return this single node.
    pub fn with_pinned_node(mut self, domain: Option<String>) -> Self {
        self.pinned_node = domain;
        self
    }

    /// Fetch the node list from this endpoint before falling back to the registry.
    pub fn with_bootstrap_url(mut self, url: Option<String>) -> Self {
        self.bootstrap_url = url;
        self
    }

    pub fn with_bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = timeout;
        self
    }

    /// Resolve this round's nodes.
    ///
    /// Fails with [`DiscoveryError::NoNodesAvailable`] only when both the
    /// bootstrap endpoint and the registry come up empty.
    pub async fn fetch_nodes(&self) -> Result<Vec<Node>, DiscoveryError> {
        if let Some(pinned) = &self.pinned_node {
            let node = Node::new(pinned)?;
            tracing::info!(domain = %node, "using pinned node, skipping discovery");
            return Ok(vec![node]);
        }

        if let Some(url) = &self.bootstrap_url {
            match self.fetch_bootstrap(url).await {
                Ok(raw) => {
                    let nodes = normalize_nodes(raw);
                    if !nodes.is_empty() {
                        tracing::debug!(count = nodes.len(), "nodes resolved from bootstrap endpoint");
                        return Ok(nodes);
                    }
                    tracing::warn!(%url, "bootstrap endpoint returned no nodes, falling back to registry");
                }
                Err(e) => {
                    tracing::warn!(%url, error = %e, "bootstrap endpoint failed, falling back to registry");
                }
            }
        }

        let nodes = match self.registry.lookup().await {
            Ok(raw) => normalize_nodes(raw),
            Err(e) => {
                tracing::warn!(error = %e, "node registry lookup failed");
                Vec::new()
            }
        };

        if nodes.is_empty() {
            return Err(DiscoveryError::NoNodesAvailable);
        }
        tracing::debug!(count = nodes.len(), "nodes resolved from registry");
        Ok(nodes)
    }

    async fn fetch_bootstrap(&self, url: &str) -> Result<Vec<Node>, DiscoveryError> {
        let resp = self
            .http_client
            .get(url)
            .timeout(self.bootstrap_timeout)
            .send()
            .await
            .map_err(|e| DiscoveryError::Bootstrap(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(DiscoveryError::Bootstrap(format!(
                "HTTP {} from {}",
                resp.status(),
                url
            )));
        }

        resp.json()
            .await
            .map_err(|e| DiscoveryError::Bootstrap(e.to_string()))
    }
}

/// Normalize domains and drop invalid entries and duplicates.
pub fn normalize_nodes(raw: Vec<Node>) -> Vec<Node> {
    let mut seen = HashSet::new();
    let mut nodes = Vec::with_capacity(raw.len());
    for entry in raw {
        match Node::new(&entry.domain) {
            Ok(node) => {
                if seen.insert(node.domain.clone()) {
                    nodes.push(node);
                }
            }
            Err(e) => tracing::debug!(error = %e, "skipping invalid node entry"),
        }
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StaticRegistry;

    struct FailingRegistry;

    impl NodeRegistry for FailingRegistry {
        async fn lookup(&self) -> Result<Vec<Node>, DiscoveryError> {
            Err(DiscoveryError::Registry("rpc unavailable".into()))
        }
    }

    fn registry(domains: &[&str]) -> StaticRegistry {
        StaticRegistry::new(domains.iter().map(|d| d.to_string()).collect())
    }

    #[test]
    fn normalize_dedupes_after_normalization() {
        let raw = vec![
            Node { domain: "a.example.org".into() },
            Node { domain: "https://a.example.org/".into() },
            Node { domain: "".into() },
            Node { domain: "b.example.org".into() },
        ];
        let nodes = normalize_nodes(raw);
        assert_eq!(
            nodes,
            vec![
                Node { domain: "https://a.example.org".into() },
                Node { domain: "https://b.example.org".into() },
            ]
        );
    }

    #[tokio::test]
    async fn pinned_node_bypasses_discovery() {
        let source = NodeSource::new(FailingRegistry)
            .with_pinned_node(Some("pinned.example.org".into()))
            .with_bootstrap_url(Some("http://127.0.0.1:1/nodes".into()));
        let nodes = source.fetch_nodes().await.unwrap();
        assert_eq!(nodes, vec![Node::new("pinned.example.org").unwrap()]);
    }

    #[tokio::test]
    async fn bootstrap_list_is_used_when_available() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/nodes")
            .with_status(200)
            .with_body(r#"[{"domain":"a.example.org"},{"address":"b.example.org"},{"domain":"a.example.org"}]"#)
            .create_async()
            .await;

        let source = NodeSource::new(registry(&["fallback.example.org"]))
            .with_bootstrap_url(Some(format!("{}/nodes", server.url())));
        let nodes = source.fetch_nodes().await.unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[1].domain, "https://b.example.org");
    }

    #[tokio::test]
    async fn bootstrap_failure_falls_back_to_registry() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/nodes").with_status(500).create_async().await;

        let source = NodeSource::new(registry(&["fallback.example.org"]))
            .with_bootstrap_url(Some(format!("{}/nodes", server.url())));
        let nodes = source.fetch_nodes().await.unwrap();
        assert_eq!(nodes, vec![Node::new("fallback.example.org").unwrap()]);
    }

    #[tokio::test]
    async fn empty_bootstrap_list_falls_back_to_registry() {
        let mut server = mockito::Server::new_async().await;
        server.mock("GET", "/nodes").with_status(200).with_body("[]").create_async().await;

        let source = NodeSource::new(registry(&["fallback.example.org"]))
            .with_bootstrap_url(Some(format!("{}/nodes", server.url())));
        assert_eq!(source.fetch_nodes().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn no_nodes_anywhere_is_an_error() {
        let source = NodeSource::new(FailingRegistry)
            .with_bootstrap_url(Some("http://127.0.0.1:1/nodes".into()));
        assert!(matches!(
            source.fetch_nodes().await,
            Err(DiscoveryError::NoNodesAvailable)
        ));

        let source = NodeSource::new(StaticRegistry::default());
        assert!(matches!(
            source.fetch_nodes().await,
            Err(DiscoveryError::NoNodesAvailable)
        ));
    }
}
