//! `reqwest`-backed implementation of the remote APIs.

use super::{AuthApi, CatalogApi, LoginResponse, ProductPage};
use crate::config::Config;
use crate::error::{Error, Result};
use async_trait::async_trait;
use catalog_engine::{Credentials, PageRequest, Product, ProductDraft, ProductId};
use reqwest::{Client, Response};
use serde::Deserialize;

/// List endpoint body. Some deployments omit `total`.
#[derive(Debug, Deserialize)]
struct ListBody {
    products: Vec<Product>,
    #[serde(default)]
    total: Option<u64>,
}

/// HTTP client for the remote catalog and auth endpoints.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    config: Config,
    client: Client,
}

impl HttpCatalogClient {
    /// Build a client with the configured base URLs and timeout.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            config: config.clone(),
            client,
        })
    }

    async fn ensure_ok(response: Response, context: &str) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(
            status = status.as_u16(),
            body = %body.chars().take(200).collect::<String>(),
            "{} rejected",
            context
        );
        Err(Error::Rejected {
            status: status.as_u16(),
            context: context.to_string(),
        })
    }
}

#[async_trait]
impl CatalogApi for HttpCatalogClient {
    async fn list(&self, request: PageRequest) -> Result<ProductPage> {
        tracing::debug!(page = request.page, limit = request.limit, "Listing products");

        let response = self
            .client
            .get(self.config.list_url("/products"))
            .query(&[("page", request.page), ("limit", request.limit)])
            .send()
            .await?;
        let body: ListBody = Self::ensure_ok(response, "list products")
            .await?
            .json()
            .await?;

        let total = body.total.unwrap_or(body.products.len() as u64);
        Ok(ProductPage {
            products: body.products,
            total,
        })
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        let response = self
            .client
            .post(self.config.api_url("/products"))
            .json(draft)
            .send()
            .await?;
        Ok(Self::ensure_ok(response, "create product")
            .await?
            .json()
            .await?)
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product> {
        let response = self
            .client
            .put(self.config.api_url(&format!("/products/{id}")))
            .json(draft)
            .send()
            .await?;
        Ok(Self::ensure_ok(response, "update product")
            .await?
            .json()
            .await?)
    }

    async fn delete(&self, id: ProductId) -> Result<()> {
        let response = self
            .client
            .delete(self.config.api_url(&format!("/products/{id}")))
            .send()
            .await?;
        Self::ensure_ok(response, "delete product").await?;
        Ok(())
    }
}

#[async_trait]
impl AuthApi for HttpCatalogClient {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        tracing::debug!(username = %credentials.username, "Logging in");

        let response = self
            .client
            .post(self.config.api_url("/auth/login"))
            .json(credentials)
            .send()
            .await?;
        Ok(Self::ensure_ok(response, "login").await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_follow_config() {
        let config = Config {
            api_url: "http://api.test".into(),
            list_url: "http://list.test/api".into(),
            ..Config::default()
        };
        let client = HttpCatalogClient::new(&config).unwrap();

        assert_eq!(client.config, config);
        assert_eq!(
            client.config.api_url("/products/3"),
            "http://api.test/products/3"
        );
        assert_eq!(
            client.config.list_url("/products"),
            "http://list.test/api/products"
        );
    }

    #[test]
    fn list_body_without_total() {
        let body: ListBody = serde_json::from_str(
            r#"{"status":"SUCCESS","products":[{"id":1,"title":"A","price":1,"category":"tv"}]}"#,
        )
        .unwrap();
        assert_eq!(body.products.len(), 1);
        assert_eq!(body.total, None);
    }
}
