//! The shared realm state container.
//!
//! [`RealmStore`] owns the only mutable state of the picker: the current
//! realm, the latest round's candidates and the connection status reported by
//! the session layer. Consumers read it, publish through compare-and-publish
//! operations, and subscribe to changes through a `tokio::sync::watch`
//! channel. Realm publications are additionally queued per subscriber, since
//! `watch` coalesces values a slow reader has not seen yet.

use std::sync::{Mutex, PoisonError};

use tokio::sync::{mpsc, watch};

use realm_types::{Candidate, ConnectionStatus, Realm};

use crate::ClientError;

/// One consistent view of the realm state.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RealmSnapshot {
    /// The published realm, absent until the first selection.
    pub realm: Option<Realm>,
    /// Candidates of the most recent completed round.
    pub candidates: Vec<Candidate>,
    /// Whether at least one round has been published.
    pub candidates_fetched: bool,
    pub connection: ConnectionStatus,
}

/// Owner of the realm state.
pub struct RealmStore {
    tx: watch::Sender<RealmSnapshot>,
    realm_subscribers: Mutex<Vec<mpsc::UnboundedSender<Realm>>>,
}

impl RealmStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(RealmSnapshot::default());
        Self {
            tx,
            realm_subscribers: Mutex::new(Vec::new()),
        }
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> RealmSnapshot {
        self.tx.borrow().clone()
    }

    pub fn current_realm(&self) -> Option<Realm> {
        self.tx.borrow().realm.clone()
    }

    pub fn candidates(&self) -> Vec<Candidate> {
        self.tx.borrow().candidates.clone()
    }

    pub fn connection_status(&self) -> ConnectionStatus {
        self.tx.borrow().connection
    }

    /// Subscribe to state changes.
    pub fn subscribe(&self) -> watch::Receiver<RealmSnapshot> {
        self.tx.subscribe()
    }

    /// Subscribe to every accepted realm publication, in order.
    ///
    /// The current realm, if any, is queued first. The receiver closes when
    /// the store is dropped.
    pub fn subscribe_realm_changes(&self) -> mpsc::UnboundedReceiver<Realm> {
        let (realm_tx, realm_rx) = mpsc::unbounded_channel();
        // Registered under the watch lock so no publication slips between
        // the seed and the registration.
        self.tx.send_if_modified(|state| {
            if let Some(realm) = &state.realm {
                let _ = realm_tx.send(realm.clone());
            }
            self.realm_subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(realm_tx);
            false
        });
        realm_rx
    }

    /// Replace the candidate list with a complete round.
    pub fn publish_candidates(&self, candidates: Vec<Candidate>) {
        self.tx.send_modify(|state| {
            state.candidates = candidates;
            state.candidates_fetched = true;
        });
    }

    /// Publish `realm` as current unless it is structurally equal to the
    /// current one. Returns whether the state changed.
    ///
    /// A new realm restarts the connection status at `connecting`.
    pub fn publish_realm(&self, realm: Realm) -> bool {
        self.tx.send_if_modified(|state| {
            if state.realm.as_ref() == Some(&realm) {
                return false;
            }
            tracing::info!(
                previous = %state.realm.as_ref().map(|r| r.to_string()).unwrap_or_default(),
                current = %realm,
                "publishing realm"
            );
            self.realm_subscribers
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .retain(|subscriber| subscriber.send(realm.clone()).is_ok());
            state.realm = Some(realm);
            state.connection = ConnectionStatus::Connecting;
            true
        })
    }

    /// Report the connection status of the current realm.
    pub fn set_connection_status(&self, status: ConnectionStatus) -> bool {
        self.tx.send_if_modified(|state| {
            if state.connection == status {
                return false;
            }
            state.connection = status;
            true
        })
    }

    /// Resolves with the candidate list once a round has been published.
    pub async fn wait_until_candidates_fetched(&self) -> Result<Vec<Candidate>, ClientError> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|state| state.candidates_fetched)
            .await
            .map_err(|_| ClientError::StateClosed)?;
        Ok(state.candidates.clone())
    }

    /// Resolves with the current realm once one has been published.
    pub async fn wait_until_realm_initialized(&self) -> Result<Realm, ClientError> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|state| state.realm.is_some())
            .await
            .map_err(|_| ClientError::StateClosed)?;
        state.realm.clone().ok_or(ClientError::NotInitialized)
    }

    /// Resolves once the session layer reports the current realm connected.
    ///
    /// An `error` or `realm-full` report rejects with that status.
    pub async fn wait_until_connected(&self) -> Result<Realm, ClientError> {
        let mut rx = self.subscribe();
        let state = rx
            .wait_for(|state| {
                state.realm.is_some()
                    && (state.connection == ConnectionStatus::Connected
                        || state.connection.is_failure())
            })
            .await
            .map_err(|_| ClientError::StateClosed)?;

        if state.connection.is_failure() {
            return Err(ClientError::Connection(state.connection));
        }
        state.realm.clone().ok_or(ClientError::NotInitialized)
    }
}

impl Default for RealmStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    fn realm(name: &str, layer: Option<&str>) -> Realm {
        Realm {
            catalyst_name: name.into(),
            domain: format!("https://{name}.example.org"),
            layer: layer.map(str::to_string),
            lighthouse_version: "1.0.0".into(),
        }
    }

    #[test]
    fn publish_realm_is_compare_and_publish() {
        let store = RealmStore::new();
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        assert!(store.publish_realm(realm("alpha", Some("red"))));
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        assert!(!store.publish_realm(realm("alpha", Some("red"))));
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn new_realm_resets_connection_status() {
        let store = RealmStore::new();
        store.publish_realm(realm("alpha", None));
        store.set_connection_status(ConnectionStatus::Connected);
        store.publish_realm(realm("beta", None));
        assert_eq!(store.connection_status(), ConnectionStatus::Connecting);
    }

    #[test]
    fn publish_candidates_marks_fetched() {
        let store = RealmStore::new();
        assert!(!store.snapshot().candidates_fetched);
        store.publish_candidates(Vec::new());
        assert!(store.snapshot().candidates_fetched);
    }

    #[test]
    fn realm_changes_are_queued_without_coalescing() {
        let store = RealmStore::new();
        store.publish_realm(realm("alpha", None));
        let mut changes = store.subscribe_realm_changes();

        assert!(store.publish_realm(realm("beta", None)));
        assert!(!store.publish_realm(realm("beta", None)));
        assert!(store.publish_realm(realm("alpha", None)));

        let names: Vec<String> = std::iter::from_fn(|| changes.try_recv().ok())
            .map(|r| r.to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "beta", "alpha"]);
    }

    #[test]
    fn dropped_realm_subscribers_are_pruned() {
        let store = RealmStore::new();
        drop(store.subscribe_realm_changes());
        store.publish_realm(realm("alpha", None));
        assert!(store.realm_subscribers.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn wait_until_realm_initialized_resolves_on_publish() {
        let store = Arc::new(RealmStore::new());
        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.wait_until_realm_initialized().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.publish_realm(realm("alpha", None));

        let got = tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(got, realm("alpha", None));
    }

    #[tokio::test]
    async fn wait_until_candidates_fetched_returns_immediately_when_ready() {
        let store = RealmStore::new();
        store.publish_candidates(Vec::new());
        let candidates = store.wait_until_candidates_fetched().await.unwrap();
        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn wait_until_connected_resolves_on_connected() {
        let store = Arc::new(RealmStore::new());
        store.publish_realm(realm("alpha", None));
        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.wait_until_connected().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.set_connection_status(ConnectionStatus::Connected);
        let got = waiter.await.unwrap().unwrap();
        assert_eq!(got.catalyst_name, "alpha");
    }

    #[tokio::test]
    async fn wait_until_connected_rejects_on_realm_full() {
        let store = Arc::new(RealmStore::new());
        store.publish_realm(realm("alpha", Some("red")));
        let waiter = {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.wait_until_connected().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        store.set_connection_status(ConnectionStatus::RealmFull);
        let err = waiter.await.unwrap().unwrap_err();
        assert!(matches!(err, ClientError::Connection(ConnectionStatus::RealmFull)));
    }
}
