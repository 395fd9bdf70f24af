//! Realm picker client.
//!
//! Ties discovery and selection to a shared [`RealmStore`], the single owner
//! of the current realm, the latest candidates and the connection status.
//! Consumers subscribe to the store directly or through a
//! [`RealmChangeObserver`], which fires only on structural realm changes.

pub mod config;
pub mod error;
pub mod location;
pub mod logging;
pub mod metrics;
pub mod observer;
pub mod realm_client;
pub mod shutdown;
pub mod state;

pub use config::ClientConfig;
pub use error::ClientError;
pub use location::{ShareableLocation, REALM_QUERY_PARAM};
pub use logging::{init_logging, LogFormat};
pub use metrics::DiscoveryMetrics;
pub use observer::{RealmChangeObserver, RealmListener};
pub use realm_client::RealmClient;
pub use shutdown::ShutdownController;
pub use state::{RealmSnapshot, RealmStore};
