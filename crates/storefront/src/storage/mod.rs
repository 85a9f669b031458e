//! Persisted key-value storage.
//!
//! Every piece of storefront state (cart, login flags, theme, quote drafts)
//! lives in a [`KeyValueStore`] under one of the [`keys`]. Values are plain
//! strings; structured values are JSON encoded.
//!
//! Stores broadcast a [`StorageEvent`] after each successful write. Consumers
//! react by re-reading the key they care about instead of sharing memory.

mod file;
mod memory;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::sync::broadcast;

pub use file::{FileStore, STORAGE_FILE};
pub use memory::MemoryStore;

/// Capacity of each store's change feed.
const EVENT_CAPACITY: usize = 64;

/// Storage keys shared by all storefront modules.
pub mod keys {
    /// Serialized list of cart lines.
    pub const CART_ITEMS: &str = "cartItems";

    /// Stringified total cart quantity.
    pub const CART_COUNT: &str = "cartCount";

    /// Theme preference (`light`, `dark` or `auto`).
    pub const THEME_MODE: &str = "theme-mode";

    /// `"true"` while someone is logged in.
    pub const IS_LOGGED_IN: &str = "isLoggedIn";

    /// Role of the logged-in account.
    pub const USER_ROLE: &str = "userRole";

    /// Email of the logged-in account.
    pub const USER_EMAIL: &str = "userEmail";

    /// Draft of the quote request form.
    pub const QUOTE_FORM: &str = "quoteRequestForm";
}

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored value could not be decoded.
    #[error("invalid value stored under {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A value could not be encoded for storage.
    #[error("failed to encode value: {0}")]
    Encode(#[source] serde_json::Error),

    /// The store's lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// What happened to a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageChange {
    Set,
    Removed,
}

/// Notification emitted after a key changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageEvent {
    pub key: String,
    pub change: StorageChange,
}

impl StorageEvent {
    /// Whether the event concerns `key`.
    #[must_use]
    pub fn is_for(&self, key: &str) -> bool {
        self.key == key
    }
}

/// A persisted string-keyed store with change notification.
///
/// Implementations must be thread-safe (`Send + Sync`). Writes are
/// single-writer in practice; no transactional guarantees are made across
/// keys.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing storage cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Subscribe to change events for all keys.
    fn subscribe(&self) -> broadcast::Receiver<StorageEvent>;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns `StorageError::Decode` if the stored value is not valid JSON for
/// `T`, or any error from the underlying read.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<T>, StorageError> {
    store
        .get(key)?
        .map(|raw| {
            serde_json::from_str(&raw).map_err(|source| StorageError::Decode {
                key: key.to_owned(),
                source,
            })
        })
        .transpose()
}

/// Encode and store a JSON value.
///
/// # Errors
///
/// Returns `StorageError::Encode` if `value` cannot be serialized, or any
/// error from the underlying write.
pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value).map_err(StorageError::Encode)?;
    store.set(key, &raw)
}

/// A value read from storage, with a user-facing notice when the read failed
/// and a default was substituted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loaded<T> {
    pub value: T,
    pub notice: Option<&'static str>,
}

impl<T> Loaded<T> {
    /// A successful read.
    #[must_use]
    pub const fn ok(value: T) -> Self {
        Self {
            value,
            notice: None,
        }
    }

    /// A failed read replaced by `value`.
    #[must_use]
    pub const fn degraded(value: T, notice: &'static str) -> Self {
        Self {
            value,
            notice: Some(notice),
        }
    }
}

/// Shared change feed used by the store implementations.
#[derive(Debug)]
struct ChangeFeed {
    sender: broadcast::Sender<StorageEvent>,
}

impl ChangeFeed {
    fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    fn publish(&self, key: &str, change: StorageChange) {
        // No subscribers is fine; events are advisory.
        let _ = self.sender.send(StorageEvent {
            key: key.to_owned(),
            change,
        });
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.sender.subscribe()
    }
}
