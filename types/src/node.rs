//! Candidate server endpoints.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

/// A catalyst endpoint discovered during one discovery round.
///
/// The domain is always stored normalized: it carries an explicit scheme and
/// no trailing slash, so two spellings of the same endpoint compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Node {
    #[serde(alias = "address", alias = "baseUrl")]
    pub domain: String,
}

impl Node {
    /// Build a node from a raw domain, normalizing it.
    ///
    /// A bare host (`peer.example.org`) gets an `https://` scheme.
    pub fn new(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(TypesError::InvalidDomain(raw.to_string()));
        }
        let domain = if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("https://{trimmed}")
        };
        Ok(Self { domain })
    }

    /// Join a relative endpoint path onto this node's domain.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.domain, path.trim_start_matches('/'))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.domain)
    }
}
