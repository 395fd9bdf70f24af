//! Fundamental types for realm discovery and selection.
//!
//! This crate defines the records shared across every other crate in the workspace:
//! candidate nodes, probe results, scored candidates, the published realm and its
//! canonical string form, grid positions, and the connection status reported back
//! by the session layer.

pub mod candidate;
pub mod connection;
pub mod error;
pub mod health;
pub mod node;
pub mod ping;
pub mod position;
pub mod realm;

pub use candidate::{Candidate, CandidateBase, IslandsCandidate, Layer, LayerCandidate};
pub use connection::ConnectionStatus;
pub use error::TypesError;
pub use health::{HealthReport, HealthStatus};
pub use node::Node;
pub use ping::{PingResult, PingStatus, StatusEnv, StatusPayload};
pub use position::ParcelPosition;
pub use realm::{Realm, RealmString};
