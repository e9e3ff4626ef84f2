//! Merging fetched pages with the overlay.
//!
//! This is the core of the catalog view. Given the overlay and a page fetched
//! from the remote, it produces the list the user sees.
//!
//! # Algorithm
//!
//! Replace (first page or refresh):
//! 1. Drop fetched products whose ID is deleted
//! 2. Swap in stored replacements
//! 3. Prepend the added products, with replacements applied to them as well
//! 4. Keep the first occurrence of each ID
//!
//! Append (load more):
//! 1. Re-apply the overlay to the list already held, since it may have
//!    changed since that list was built
//! 2. Apply the overlay to the fetched page
//! 3. Append page entries whose IDs are not held yet

use crate::{Overlay, Product, ProductId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// How a fetched page combines with the list already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MergeMode {
    /// Start over: added products followed by the page
    #[default]
    Replace,
    /// Keep the held list and append the new page
    Append,
}

impl MergeMode {
    pub fn from_append(append: bool) -> Self {
        if append {
            MergeMode::Append
        } else {
            MergeMode::Replace
        }
    }
}

/// Result of merging one page.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeResult {
    /// The effective list
    pub products: Vec<Product>,
    /// Fetched products hidden because they were deleted
    pub hidden: usize,
    /// Fetched products swapped for a stored replacement
    pub replaced: usize,
    /// Products dropped because their ID was already listed
    pub duplicates: usize,
}

impl MergeResult {
    /// IDs of the effective list, in order.
    pub fn ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    fn push_unique(&mut self, seen: &mut HashSet<ProductId>, product: Product) {
        if seen.insert(product.id) {
            self.products.push(product);
        } else {
            self.duplicates += 1;
        }
    }
}

/// Applies an overlay to fetched pages.
#[derive(Debug, Clone, Copy)]
pub struct Merger<'a> {
    overlay: &'a Overlay,
}

impl<'a> Merger<'a> {
    pub fn new(overlay: &'a Overlay) -> Self {
        Self { overlay }
    }

    /// Merge `page` in the given mode. `held` is ignored when replacing.
    pub fn merge(&self, mode: MergeMode, held: &[Product], page: Vec<Product>) -> MergeResult {
        match mode {
            MergeMode::Replace => self.replace(page),
            MergeMode::Append => self.append(held, page),
        }
    }

    /// Build a fresh list: added products first, then the page.
    pub fn replace(&self, page: Vec<Product>) -> MergeResult {
        let mut result = MergeResult::default();
        let page = self.effective_page(page, &mut result);
        let added = self.overlay.apply(self.overlay.added.iter().cloned());

        let mut seen = HashSet::with_capacity(added.len() + page.len());
        for product in added.into_iter().chain(page) {
            result.push_unique(&mut seen, product);
        }
        result
    }

    /// Extend `held` with the entries of `page` it does not contain yet.
    pub fn append(&self, held: &[Product], page: Vec<Product>) -> MergeResult {
        let mut result = MergeResult::default();
        let held = self.overlay.apply(held.iter().cloned());
        let page = self.effective_page(page, &mut result);

        let mut seen = HashSet::with_capacity(held.len() + page.len());
        for product in held.into_iter().chain(page) {
            result.push_unique(&mut seen, product);
        }
        result
    }

    fn effective_page(&self, page: Vec<Product>, result: &mut MergeResult) -> Vec<Product> {
        let mut effective = Vec::with_capacity(page.len());
        for product in page {
            if self.overlay.is_deleted(product.id) {
                result.hidden += 1;
                continue;
            }
            match self.overlay.replacement(product.id) {
                Some(replacement) => {
                    result.replaced += 1;
                    effective.push(replacement.clone());
                }
                None => effective.push(product),
            }
        }
        effective
    }
}
