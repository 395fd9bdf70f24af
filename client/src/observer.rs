//! Realm change fan-out for consumers outside the picker.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use realm_types::Realm;

/// Callback invoked with `(previous, current)` on every realm change.
pub type RealmListener = Box<dyn Fn(Option<&Realm>, &Realm) + Send + Sync>;

/// Synchronous fan-out of realm changes.
///
/// Remembers the last realm it saw and notifies listeners only when a
/// structurally different realm arrives. Listeners run inline on
/// the observing task; keep them fast.
pub struct RealmChangeObserver {
    last: Option<Realm>,
    listeners: Vec<RealmListener>,
}

impl RealmChangeObserver {
    pub fn new() -> Self {
        Self {
            last: None,
            listeners: Vec::new(),
        }
    }

    pub fn subscribe(&mut self, listener: RealmListener) {
        self.listeners.push(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// The realm most recently delivered to listeners.
    pub fn last_realm(&self) -> Option<&Realm> {
        self.last.as_ref()
    }

    /// Compare `current` against the last seen realm and notify on change.
    ///
    /// Returns whether listeners were invoked.
    pub fn observe(&mut self, current: &Realm) -> bool {
        if self.last.as_ref() == Some(current) {
            return false;
        }

        for listener in &self.listeners {
            listener(self.last.as_ref(), current);
        }
        self.last = Some(current.clone());
        true
    }

    /// Run the observer over the realm publications of a store, as returned
    /// by `RealmStore::subscribe_realm_changes`, until the store is dropped.
    pub fn spawn(mut self, mut changes: mpsc::UnboundedReceiver<Realm>) -> JoinHandle<()> {
        tokio::spawn(async move {
            while let Some(realm) = changes.recv().await {
                self.observe(&realm);
            }
            tracing::debug!("realm store dropped, stopping change observer");
        })
    }
}

impl Default for RealmChangeObserver {
    fn default() -> Self {
        Self::new()
    }
}
