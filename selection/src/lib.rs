//! Candidate scoring, realm selection and crowded-realm migration.
//!
//! Everything in this crate is synchronous and pure: it turns the probe
//! results of one discovery round into scored candidates and picks the realm
//! a client should join.
//!
//! - [`score`]: desirability of a candidate from its occupancy
//! - [`builder`]: probe results -> typed candidates
//! - [`selector`]: filter + tie-break cascade -> the single best realm
//! - [`crowded`]: proximity-driven migration to a busier nearby realm

pub mod builder;
pub mod crowded;
pub mod error;
pub mod score;
pub mod selector;

pub use builder::build_candidates;
pub use crowded::{count_close_parcels, CrowdedOutcome, CrowdedRealmFinder, CROWDED_RADIUS};
pub use error::SelectionError;
pub use score::{islands_score, layer_score};
pub use selector::{resolve_realm, users_by_domain, RealmSelector, LATENCY_DOMINANCE_MS};
