//! Top-level error type shared across crates.

use thiserror::Error;

/// Errors raised while constructing or parsing the shared types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid realm string: {0:?}")]
    InvalidRealmString(String),

    #[error("invalid node domain: {0:?}")]
    InvalidDomain(String),
}
