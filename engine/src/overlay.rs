//! Local changes layered over the remote catalog.
//!
//! The remote catalog forgets every mutation, so the overlay is what makes
//! deletes, edits and additions stick. It is three independent collections,
//! all keyed by product ID. Ordered maps keep serialization deterministic.

use crate::{Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What a delete did to the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The product was created locally and has been dropped from `added`
    RemovedAdded,
    /// The product came from the remote and is now hidden for good
    Tombstoned,
}

/// Local deletes, modifications and additions.
///
/// Invariants:
/// - an ID in `deleted` is never a key of `modified`
/// - an ID in `added` is never in `deleted`
/// - `added` holds each ID at most once, most recently added first
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    /// IDs that must never be shown again
    pub deleted: BTreeSet<ProductId>,
    /// Full replacements, applied wherever the ID shows up
    pub modified: BTreeMap<ProductId, Product>,
    /// Locally created products, newest first
    pub added: Vec<Product>,
}

impl Overlay {
    /// Create an empty overlay.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an overlay from separately stored collections.
    ///
    /// Entries that would break the invariants are dropped: modifications of
    /// deleted IDs, added products that were deleted, and repeated added IDs.
    pub fn from_parts(
        deleted: BTreeSet<ProductId>,
        mut modified: BTreeMap<ProductId, Product>,
        added: Vec<Product>,
    ) -> Self {
        modified.retain(|id, _| !deleted.contains(id));

        let mut seen = BTreeSet::new();
        let added = added
            .into_iter()
            .filter(|p| !deleted.contains(&p.id) && seen.insert(p.id))
            .collect();

        Self {
            deleted,
            modified,
            added,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty() && self.modified.is_empty() && self.added.is_empty()
    }

    /// Drop every local change.
    pub fn clear(&mut self) {
        self.deleted.clear();
        self.modified.clear();
        self.added.clear();
    }

    pub fn is_deleted(&self, id: ProductId) -> bool {
        self.deleted.contains(&id)
    }

    pub fn is_added(&self, id: ProductId) -> bool {
        self.added.iter().any(|p| p.id == id)
    }

    /// The stored replacement for `id`, if any.
    pub fn replacement(&self, id: ProductId) -> Option<&Product> {
        self.modified.get(&id)
    }

    /// Record a locally created product at the front of `added`.
    pub fn record_added(&mut self, product: Product) {
        self.added.retain(|p| p.id != product.id);
        self.deleted.remove(&product.id);
        self.added.insert(0, product);
    }

    /// Record a full replacement for a product.
    ///
    /// Returns `false` and records nothing if the ID has been deleted.
    pub fn record_modified(&mut self, product: Product) -> bool {
        if self.deleted.contains(&product.id) {
            return false;
        }
        self.modified.insert(product.id, product);
        true
    }

    /// Record a delete.
    ///
    /// Locally added products are removed from `added` as if they never
    /// existed. Anything else is tombstoned. Either way the modification
    /// entry goes away.
    pub fn record_deleted(&mut self, id: ProductId) -> DeleteOutcome {
        self.modified.remove(&id);

        let before = self.added.len();
        self.added.retain(|p| p.id != id);
        if self.added.len() != before {
            return DeleteOutcome::RemovedAdded;
        }

        self.deleted.insert(id);
        DeleteOutcome::Tombstoned
    }

    /// Apply deletes and modifications to a sequence of products.
    ///
    /// Order is preserved. Additions are not touched; see [`crate::Merger`].
    pub fn apply(&self, products: impl IntoIterator<Item = Product>) -> Vec<Product> {
        products
            .into_iter()
            .filter(|p| !self.deleted.contains(&p.id))
            .map(|p| match self.modified.get(&p.id) {
                Some(replacement) => replacement.clone(),
                None => p,
            })
            .collect()
    }

    /// IDs of all locally created products.
    pub fn added_ids(&self) -> impl Iterator<Item = ProductId> + '_ {
        self.added.iter().map(|p| p.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Origin, ProductDraft};

    fn product(id: ProductId, title: &str) -> Product {
        Product::from_draft(
            id,
            ProductDraft::new(
                title,
                10.0,
                "A test product",
                Category::Electronics,
                "https://img/p.png",
            ),
        )
    }

    #[test]
    fn new_overlay_is_empty() {
        let overlay = Overlay::new();
        assert!(overlay.is_empty());
        assert!(!overlay.is_deleted(1));
        assert!(overlay.replacement(1).is_none());
    }

    #[test]
    fn added_newest_first_without_duplicates() {
        let mut overlay = Overlay::new();
        overlay.record_added(product(-1, "first"));
        overlay.record_added(product(-2, "second"));
        overlay.record_added(product(-1, "first again"));

        let titles: Vec<_> = overlay.added.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["first again", "second"]);
        assert!(overlay.added_ids().all(|id| Origin::of(id) == Origin::Local));
    }

    #[test]
    fn delete_remote_tombstones() {
        let mut overlay = Overlay::new();
        overlay.record_modified(product(3, "edited"));

        assert_eq!(overlay.record_deleted(3), DeleteOutcome::Tombstoned);
        assert!(overlay.is_deleted(3));
        assert!(overlay.replacement(3).is_none());
    }

    #[test]
    fn delete_added_forgets_it() {
        let mut overlay = Overlay::new();
        overlay.record_added(product(-10, "local"));
        overlay.record_modified(product(-10, "local edited"));

        assert_eq!(overlay.record_deleted(-10), DeleteOutcome::RemovedAdded);
        assert!(!overlay.is_added(-10));
        assert!(!overlay.is_deleted(-10));
        assert!(overlay.modified.is_empty());
        assert!(overlay.is_empty());
    }

    #[test]
    fn modify_after_delete_is_refused() {
        let mut overlay = Overlay::new();
        overlay.record_deleted(5);
        assert!(!overlay.record_modified(product(5, "ghost")));
        assert!(overlay.modified.is_empty());
    }

    #[test]
    fn apply_filters_and_replaces_in_order() {
        let mut overlay = Overlay::new();
        overlay.record_deleted(2);
        overlay.record_modified(product(3, "edited"));

        let result = overlay.apply(vec![product(1, "a"), product(2, "b"), product(3, "c")]);
        let titles: Vec<_> = result.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a", "edited"]);
    }

    #[test]
    fn from_parts_repairs_invariants() {
        let deleted = BTreeSet::from([4]);
        let modified = BTreeMap::from([(4, product(4, "stale")), (5, product(5, "kept"))]);
        let added = vec![product(-1, "x"), product(-1, "dup"), product(4, "deleted")];

        let overlay = Overlay::from_parts(deleted, modified, added);
        assert_eq!(overlay.modified.keys().copied().collect::<Vec<_>>(), vec![5]);
        assert_eq!(overlay.added_ids().collect::<Vec<_>>(), vec![-1]);
        assert_eq!(overlay.added[0].title, "x");
    }

    #[test]
    fn modified_keys_serialize_as_strings() {
        let mut overlay = Overlay::new();
        overlay.record_modified(product(3, "edited"));
        overlay.record_deleted(7);

        let value = serde_json::to_value(&overlay).unwrap();
        assert!(value["modified"].get("3").is_some());
        assert_eq!(value["deleted"], serde_json::json!([7]));

        let parsed: Overlay = serde_json::from_value(value).unwrap();
        assert_eq!(parsed, overlay);
    }

    #[test]
    fn clear_empties_everything() {
        let mut overlay = Overlay::new();
        overlay.record_added(product(-1, "x"));
        overlay.record_deleted(2);
        overlay.record_modified(product(3, "y"));

        overlay.clear();
        assert!(overlay.is_empty());
    }
}
