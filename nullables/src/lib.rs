//! Nullable infrastructure for deterministic testing.
//!
//! Everything a discovery round talks to over the network sits behind a
//! trait in `realm-discovery`. This crate provides stand-ins that:
//! - Answer from a script instead of a catalyst
//! - Can be re-scripted while a client holds them
//! - Count the probes they receive
//!
//! Usage: hand a [`NullProber`] and a [`NullRegistry`] to a `RealmClient`
//! and keep clones to steer them from the test.

pub mod prober;
pub mod registry;
pub mod status;

pub use prober::NullProber;
pub use registry::NullRegistry;
pub use status::{islands_status, layer, layered_status, with_parcels};
