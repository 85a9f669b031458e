//! Cart count badge.

use tokio::sync::broadcast::{self, error::RecvError, error::TryRecvError};
use tracing::debug;

use crate::storage::{KeyValueStore, StorageEvent, keys};

/// Follows the persisted `cartCount` the way a header badge does: it keeps
/// the last value it read and re-reads the store whenever a `cartCount`
/// event arrives.
pub struct CartBadge<'a> {
    store: &'a dyn KeyValueStore,
    events: broadcast::Receiver<StorageEvent>,
    count: u32,
}

impl<'a> CartBadge<'a> {
    /// Subscribe to `store` and read the current count.
    #[must_use]
    pub fn new(store: &'a dyn KeyValueStore) -> Self {
        let events = store.subscribe();
        let count = read_count(store);
        Self {
            store,
            events,
            count,
        }
    }

    /// The last count read.
    #[must_use]
    pub const fn count(&self) -> u32 {
        self.count
    }

    /// Drain pending events without waiting. Returns `true` if the count was
    /// re-read.
    pub fn poll(&mut self) -> bool {
        let mut stale = false;
        loop {
            match self.events.try_recv() {
                Ok(event) => stale |= event.is_for(keys::CART_COUNT),
                Err(TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Cart badge lagged behind store events");
                    stale = true;
                }
                Err(TryRecvError::Empty | TryRecvError::Closed) => break,
            }
        }
        if stale {
            self.count = read_count(self.store);
        }
        stale
    }

    /// Wait for the next `cartCount` change and return the re-read count.
    ///
    /// Returns `None` once the store's change feed is closed.
    pub async fn changed(&mut self) -> Option<u32> {
        loop {
            match self.events.recv().await {
                Ok(event) if event.is_for(keys::CART_COUNT) => break,
                Ok(_) => {}
                Err(RecvError::Lagged(_)) => break,
                Err(RecvError::Closed) => return None,
            }
        }
        self.count = read_count(self.store);
        Some(self.count)
    }
}

/// Parse the stored count; anything missing or unparsable is 0.
fn read_count(store: &dyn KeyValueStore) -> u32 {
    store
        .get(keys::CART_COUNT)
        .ok()
        .flatten()
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(0)
}
