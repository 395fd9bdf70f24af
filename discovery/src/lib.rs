//! Catalyst discovery and probing.
//!
//! A discovery round resolves the candidate node list ([`NodeSource`]),
//! health-checks every node in parallel, pings the healthy ones for status and
//! latency, and builds the round's candidates.
//!
//! Design:
//! - Each probe is bounded by its own timeout; a slow node never holds up the
//!   others beyond that bound
//! - A failing node is a value (unhealthy report, unreachable ping), never an
//!   error for the round
//! - Only "no nodes at all" escalates, as [`DiscoveryError::NoNodesAvailable`]
//! - Probing sits behind [`CatalystProber`] so rounds run against stand-ins in tests

pub mod client;
pub mod error;
pub mod prober;
pub mod registry;
pub mod round;
pub mod source;

pub use client::{CatalystClient, DEFAULT_HEALTH_PATH, DEFAULT_PROBE_TIMEOUT, DEFAULT_STATUS_PATH};
pub use error::DiscoveryError;
pub use prober::CatalystProber;
pub use registry::{NodeRegistry, StaticRegistry};
pub use round::{DiscoveryRound, RoundOutcome};
pub use source::{normalize_nodes, NodeSource};
