use thiserror::Error;

use realm_types::ConnectionStatus;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("discovery error: {0}")]
    Discovery(#[from] realm_discovery::DiscoveryError),

    #[error("selection error: {0}")]
    Selection(#[from] realm_selection::SelectionError),

    #[error("invalid input: {0}")]
    Types(#[from] realm_types::TypesError),

    #[error("connection to realm failed: {0}")]
    Connection(ConnectionStatus),

    #[error("no realm has been selected yet")]
    NotInitialized,

    #[error("realm state was dropped while waiting")]
    StateClosed,

    #[error("config error: {0}")]
    Config(String),

    #[error("invalid shareable location: {0}")]
    Location(String),

    #[error("metrics error: {0}")]
    Metrics(String),
}
