//! Owner of the live tracker state.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    models::PlayerId,
    persistence::{Gateway, KeyValueStore},
    roster,
    state::{Mutation, StorageKey, TrackerState},
};

/// Applies mutations, persists the touched slots and publishes each new
/// snapshot to subscribers.
pub struct Store<B: KeyValueStore> {
    gateway: Gateway<B>,
    state: Arc<TrackerState>,
    notifier: watch::Sender<Arc<TrackerState>>,
}

impl<B: KeyValueStore> Store<B> {
    /// Load the stored state from `backend`.
    pub fn open(backend: B) -> Self {
        let gateway = Gateway::new(backend);
        let state = Arc::new(gateway.load());
        let (notifier, _) = watch::channel(Arc::clone(&state));
        Self {
            gateway,
            state,
            notifier,
        }
    }

    /// Current snapshot.
    pub fn snapshot(&self) -> Arc<TrackerState> {
        Arc::clone(&self.state)
    }

    /// Receiver that observes every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<Arc<TrackerState>> {
        self.notifier.subscribe()
    }

    pub fn backend(&self) -> &B {
        self.gateway.backend()
    }

    /// Apply `mutation`. Returns `false` when it did not apply.
    pub fn dispatch(&mut self, mutation: Mutation) -> bool {
        let Some(next) = self.state.apply(&mutation) else {
            debug!(?mutation, "Mutation not applicable");
            return false;
        };
        debug!(?mutation, "Mutation applied");
        self.gateway.save(&next, mutation.touched_keys());
        self.publish(next);
        true
    }

    /// Append an empty player and return its id.
    pub fn add_player(&mut self) -> PlayerId {
        let id = roster::next_player_id(&self.state.players, Utc::now());
        self.dispatch(Mutation::AddPlayer { id });
        id
    }

    /// Erase all stored data and return to the default state.
    pub fn clear_all(&mut self) {
        self.gateway.clear();
        self.publish(TrackerState::default());
        info!("Tracker reset to defaults");
    }

    /// Write every slot one final time.
    pub fn close(self) {
        self.gateway.save(&self.state, &StorageKey::ALL);
        debug!("Store closed");
    }

    fn publish(&mut self, next: TrackerState) {
        self.state = Arc::new(next);
        self.notifier.send_replace(Arc::clone(&self.state));
    }
}
