//! Durable string-keyed storage.
//!
//! Everything the client persists goes through [`Storage`]: the overlay
//! collections and the session. Values are JSON strings. Storage problems
//! never fail an operation; they are logged and the affected value reads as
//! its default.

mod file;
mod memory;
mod overlay_store;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use overlay_store::{OverlayStore, ADDED_KEY, DELETED_KEY, LEGACY_CACHE_KEY, MODIFIED_KEY};

use serde::{de::DeserializeOwned, Serialize};
use std::io;
use std::sync::Arc;

/// A synchronous key-value store.
pub trait Storage: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&self, key: &str, value: &str) -> io::Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> io::Result<()>;
}

/// Storage handle shared between components.
pub type SharedStorage = Arc<dyn Storage>;

/// Read and decode `key`. Missing and corrupted values both yield `None`.
pub(crate) fn load_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Option<T> {
    let raw = storage.get(key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "Discarding corrupted stored value");
            None
        }
    }
}

/// Encode and write `value` under `key`, logging failures.
pub(crate) fn store_json<T: Serialize + ?Sized>(storage: &dyn Storage, key: &str, value: &T) {
    let result = serde_json::to_string(value)
        .map_err(io::Error::other)
        .and_then(|raw| storage.set(key, &raw));
    if let Err(e) = result {
        tracing::error!(key = %key, error = %e, "Failed to persist value");
    }
}

/// Remove `key`, logging failures.
pub(crate) fn remove_key(storage: &dyn Storage, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::error!(key = %key, error = %e, "Failed to remove stored value");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_json_missing_and_corrupted() {
        let storage = MemoryStorage::new();
        assert_eq!(load_json::<Vec<i64>>(&storage, "ids"), None);

        storage.set("ids", "[1, 2").unwrap();
        assert_eq!(load_json::<Vec<i64>>(&storage, "ids"), None);

        store_json(&storage, "ids", &vec![1i64, 2]);
        assert_eq!(load_json::<Vec<i64>>(&storage, "ids"), Some(vec![1, 2]));
    }

    #[test]
    fn remove_key_missing_is_fine() {
        let storage = MemoryStorage::new();
        remove_key(&storage, "nothing");
        assert!(storage.is_empty());
    }
}
