//! JSON-file backed store.
//!
//! The whole store is one JSON object written to `<dir>/storage.json`. Each
//! write rewrites the file through a temporary sibling and a rename, so a
//! crash mid-write leaves the previous snapshot intact.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tokio::sync::broadcast;
use tracing::{debug, warn};

use super::{ChangeFeed, KeyValueStore, StorageChange, StorageError, StorageEvent};

/// File name of the snapshot inside the data directory.
pub const STORAGE_FILE: &str = "storage.json";

/// A [`KeyValueStore`] persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
    feed: ChangeFeed,
}

impl FileStore {
    /// Open (or create) the store in `dir`.
    ///
    /// A missing file starts an empty store. An unreadable or corrupt file is
    /// logged and also starts empty; it is replaced on the next write.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if `dir` cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StorageError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(STORAGE_FILE);
        let entries = load_snapshot(&path);

        debug!(path = %path.display(), keys = entries.len(), "Opened file store");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
            feed: ChangeFeed::new(),
        })
    }

    /// Location of the snapshot file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_snapshot(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        let json = serde_json::to_string_pretty(entries).map_err(StorageError::Encode)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn mutate(
        &self,
        key: &str,
        change: StorageChange,
        apply: impl FnOnce(&mut BTreeMap<String, String>),
    ) -> Result<(), StorageError> {
        {
            let mut guard = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
            // Memory only changes once the file write succeeded.
            let mut next = guard.clone();
            apply(&mut next);
            self.write_snapshot(&next)?;
            *guard = next;
        }
        debug!(key, ?change, "Store write");
        self.feed.publish(key, change);
        Ok(())
    }
}

fn load_snapshot(path: &Path) -> BTreeMap<String, String> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return BTreeMap::new(),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read storage file, starting empty");
            return BTreeMap::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "Corrupt storage file, starting empty");
        BTreeMap::new()
    })
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let guard = self.entries.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.mutate(key, StorageChange::Set, |entries| {
            entries.insert(key.to_owned(), value.to_owned());
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.mutate(key, StorageChange::Removed, |entries| {
            entries.remove(key);
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.feed.subscribe()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("mms-file-store-{name}-{}", uuid::Uuid::new_v4()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_values_survive_reopen() {
        let dir = scratch_dir("reopen");
        {
            let store = FileStore::open(&dir).unwrap();
            store.set("cartCount", "2").unwrap();
            store.set("theme-mode", "dark").unwrap();
            store.remove("theme-mode").unwrap();
        }

        let reopened = FileStore::open(&dir).unwrap();
        assert_eq!(reopened.get("cartCount").unwrap().as_deref(), Some("2"));
        assert_eq!(reopened.get("theme-mode").unwrap(), None);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_corrupt_file_starts_empty_and_is_replaced() {
        let dir = scratch_dir("corrupt");
        fs::write(dir.join(STORAGE_FILE), "{{{").unwrap();

        let store = FileStore::open(&dir).unwrap();
        assert_eq!(store.get("cartCount").unwrap(), None);

        store.set("cartCount", "1").unwrap();
        let raw = fs::read_to_string(store.path()).unwrap();
        let parsed: BTreeMap<String, String> = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.get("cartCount").map(String::as_str), Some("1"));
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_open_creates_missing_directory() {
        let dir = std::env::temp_dir().join(format!("mms-file-store-new-{}", uuid::Uuid::new_v4()));
        let store = FileStore::open(dir.join("nested")).unwrap();
        store.set("k", "v").unwrap();
        assert!(store.path().exists());
        fs::remove_dir_all(dir).unwrap();
    }
}
