use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("no nodes available")]
    NoNodesAvailable,

    #[error("bootstrap endpoint failed: {0}")]
    Bootstrap(String),

    #[error("node registry lookup failed: {0}")]
    Registry(String),

    #[error("invalid node: {0}")]
    InvalidNode(#[from] realm_types::TypesError),
}
