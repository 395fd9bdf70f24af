//! Keeps a shareable URL in sync with the current realm.

use std::sync::{Arc, Mutex, PoisonError};

use reqwest::Url;

use realm_types::Realm;

use crate::observer::RealmListener;
use crate::ClientError;

/// Query parameter carrying the realm string.
pub const REALM_QUERY_PARAM: &str = "realm";

/// A URL whose `realm` query parameter tracks the current realm.
///
/// Other query parameters are preserved in their original order.
#[derive(Clone, Debug)]
pub struct ShareableLocation {
    url: Arc<Mutex<Url>>,
}

impl ShareableLocation {
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let url = Url::parse(raw).map_err(|e| ClientError::Location(format!("{raw}: {e}")))?;
        Ok(Self {
            url: Arc::new(Mutex::new(url)),
        })
    }

    /// The current URL.
    pub fn url(&self) -> Url {
        self.url
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Rewrite the `realm` parameter with `realm`'s realm string.
    pub fn set_realm(&self, realm: &Realm) {
        let mut url = self.url.lock().unwrap_or_else(PoisonError::into_inner);
        let kept: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != REALM_QUERY_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();

        {
            let mut pairs = url.query_pairs_mut();
            pairs.clear();
            for (key, value) in &kept {
                pairs.append_pair(key, value);
            }
            pairs.append_pair(REALM_QUERY_PARAM, &realm.realm_string().to_string());
        }
        tracing::debug!(url = %url, "shareable location updated");
    }

    /// A [`RealmChangeObserver`](crate::RealmChangeObserver) listener that
    /// keeps this location current.
    pub fn listener(&self) -> RealmListener {
        let location = self.clone();
        Box::new(move |_, current| location.set_realm(current))
    }
}
