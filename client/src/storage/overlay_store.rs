//! Typed access to the persisted overlay.

use super::{load_json, remove_key, store_json, SharedStorage};
use catalog_engine::{Overlay, Product, ProductId};
use std::collections::{BTreeMap, BTreeSet};

/// Key holding the deleted product IDs (JSON array).
pub const DELETED_KEY: &str = "deleted_product_ids";
/// Key holding modified products by ID (JSON object).
pub const MODIFIED_KEY: &str = "modified_products";
/// Key holding locally added products, newest first (JSON array).
pub const ADDED_KEY: &str = "added_products";
/// Key of a page cache older clients wrote. Only ever removed.
pub const LEGACY_CACHE_KEY: &str = "products_cache";

/// Loads and saves the overlay through a [`super::Storage`] handle.
///
/// The three collections live under separate keys. A corrupted key only
/// loses its own collection.
#[derive(Clone)]
pub struct OverlayStore {
    storage: SharedStorage,
}

impl OverlayStore {
    pub fn new(storage: SharedStorage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &SharedStorage {
        &self.storage
    }

    /// Read the overlay. Missing or corrupted collections read as empty.
    pub fn load(&self) -> Overlay {
        let storage = self.storage.as_ref();
        let deleted: BTreeSet<ProductId> = load_json(storage, DELETED_KEY).unwrap_or_default();
        let modified: BTreeMap<ProductId, Product> =
            load_json(storage, MODIFIED_KEY).unwrap_or_default();
        let added: Vec<Product> = load_json(storage, ADDED_KEY).unwrap_or_default();

        Overlay::from_parts(deleted, modified, added)
    }

    /// Write all three collections.
    pub fn save(&self, overlay: &Overlay) {
        let storage = self.storage.as_ref();
        store_json(storage, DELETED_KEY, &overlay.deleted);
        store_json(storage, MODIFIED_KEY, &overlay.modified);
        store_json(storage, ADDED_KEY, &overlay.added);
    }

    /// Remove the overlay keys and the legacy page cache.
    pub fn clear(&self) {
        for key in [DELETED_KEY, MODIFIED_KEY, ADDED_KEY, LEGACY_CACHE_KEY] {
            remove_key(self.storage.as_ref(), key);
        }
    }
}

impl std::fmt::Debug for OverlayStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OverlayStore").finish_non_exhaustive()
    }
}
