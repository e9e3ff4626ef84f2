//! Observable catalog state.

use catalog_engine::{PageSize, Pagination, Product, ProductId};
use serde::Serialize;

/// Everything a view needs to render the catalog.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogState {
    /// Effective product list, in display order
    pub products: Vec<Product>,
    pub pagination: Pagination,
    /// Message of the most recent remote failure
    pub last_error: Option<String>,
    /// True while any operation is in flight
    pub loading: bool,
}

impl CatalogState {
    /// State before the first fetch.
    pub fn new(limit: PageSize) -> Self {
        Self {
            pagination: Pagination::initial(limit),
            ..Self::default()
        }
    }

    pub fn get(&self, id: ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    pub fn contains(&self, id: ProductId) -> bool {
        self.get(id).is_some()
    }

    pub fn ids(&self) -> Vec<ProductId> {
        self.products.iter().map(|p| p.id).collect()
    }
}
