//! Remote catalog and auth APIs.
//!
//! The reconciler and session manager only see these traits, so tests can
//! swap in in-memory fakes for the HTTP client.

mod http;

pub use http::HttpCatalogClient;

use crate::error::Result;
use async_trait::async_trait;
use catalog_engine::{Credentials, PageRequest, Product, ProductDraft, ProductId};
use serde::{Deserialize, Serialize};

/// One page of the remote catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// Number of products across all pages
    pub total: u64,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

/// Product endpoints of the remote catalog.
///
/// Mutations are acknowledged but never persisted by the remote; callers
/// must not trust what they echo back.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    async fn list(&self, request: PageRequest) -> Result<ProductPage>;

    async fn create(&self, draft: &ProductDraft) -> Result<Product>;

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product>;

    async fn delete(&self, id: ProductId) -> Result<()>;
}

/// Auth endpoint of the remote.
#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;
}
