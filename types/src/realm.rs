//! The published realm and its canonical textual form.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The realm a client is (or will be) connected to.
///
/// Equality is structural: two realms built from separate probe rounds of the
/// same catalyst and layer compare equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Realm {
    pub catalyst_name: String,
    pub domain: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<String>,
    pub lighthouse_version: String,
}

impl Realm {
    /// Canonical string identity of this realm.
    pub fn realm_string(&self) -> RealmString {
        RealmString {
            catalyst_name: self.catalyst_name.clone(),
            layer: self.layer.clone(),
        }
    }
}

impl fmt::Display for Realm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.realm_string().fmt(f)
    }
}

/// `"<catalystName>"` or `"<catalystName>-<layerName>"`.
///
/// Parsing splits on the first `-`, so a catalyst name must not contain one;
/// layer names may.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RealmString {
    pub catalyst_name: String,
    pub layer: Option<String>,
}

impl RealmString {
    pub fn new(catalyst_name: impl Into<String>, layer: Option<String>) -> Self {
        Self {
            catalyst_name: catalyst_name.into(),
            layer,
        }
    }
}

impl FromStr for RealmString {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (name, layer) = match s.split_once('-') {
            Some((name, layer)) => (name, Some(layer)),
            None => (s, None),
        };
        if name.is_empty() || layer.is_some_and(str::is_empty) {
            return Err(TypesError::InvalidRealmString(s.to_string()));
        }
        Ok(Self {
            catalyst_name: name.to_string(),
            layer: layer.map(str::to_string),
        })
    }
}

impl fmt::Display for RealmString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.layer {
            Some(layer) => write!(f, "{}-{}", self.catalyst_name, layer),
            None => f.write_str(&self.catalyst_name),
        }
    }
}
