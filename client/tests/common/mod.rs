//! Shared fakes for the integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use catalog_client::{AuthApi, CatalogApi, Error, LoginResponse, ProductPage, Result};
use catalog_engine::{
    Category, Credentials, PageRequest, Product, ProductDraft, ProductId, Rating,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use tokio::sync::Notify;

/// Route `tracing` output to the test harness. `RUST_LOG` picks the level.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_client=debug".into()),
        )
        .with_test_writer()
        .try_init();
}

pub fn remote_product(id: ProductId) -> Product {
    Product::from_draft(
        id,
        ProductDraft::new(
            format!("Remote product {id}"),
            10.0 + id as f64,
            "Straight from the remote catalog",
            Category::Electronics,
            format!("https://img.example/{id}.png"),
        ),
    )
    .with_rating(Some(Rating {
        rate: 4.1,
        count: 120,
    }))
}

pub fn shirt() -> ProductDraft {
    ProductDraft::new(
        "Shirt",
        19.99,
        "A plain shirt fabric",
        Category::MensClothing,
        "https://x/y.png",
    )
}

/// Remote catalog that, like the real one, forgets every mutation.
pub struct FakeCatalog {
    products: Vec<Product>,
    /// Held by `list` until released when gated
    gate: Option<Notify>,
    /// Signalled whenever `list` starts
    pub list_started: Notify,
    fail_list: AtomicBool,
    fail_mutations: AtomicBool,
    pub list_calls: AtomicUsize,
    pub mutation_calls: AtomicUsize,
    pub deleted: Mutex<Vec<ProductId>>,
}

impl FakeCatalog {
    /// Catalog with remote products `1..=count`.
    pub fn with_count(count: i64) -> Self {
        Self::with_ids(1..=count)
    }

    pub fn with_ids(ids: impl IntoIterator<Item = ProductId>) -> Self {
        Self {
            products: ids.into_iter().map(remote_product).collect(),
            gate: None,
            list_started: Notify::new(),
            fail_list: AtomicBool::new(false),
            fail_mutations: AtomicBool::new(false),
            list_calls: AtomicUsize::new(0),
            mutation_calls: AtomicUsize::new(0),
            deleted: Mutex::new(Vec::new()),
        }
    }

    /// Make every `list` call wait for [`Self::release`].
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    /// Let one waiting `list` call through.
    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn fail_list(&self, fail: bool) {
        self.fail_list.store(fail, Ordering::SeqCst);
    }

    pub fn fail_mutations(&self, fail: bool) {
        self.fail_mutations.store(fail, Ordering::SeqCst);
    }

    fn mutation(&self) -> Result<()> {
        self.mutation_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_mutations.load(Ordering::SeqCst) {
            return Err(Error::Rejected {
                status: 500,
                context: "mutation".into(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn list(&self, request: PageRequest) -> Result<ProductPage> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        self.list_started.notify_one();
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if self.fail_list.load(Ordering::SeqCst) {
            return Err(Error::Network("connection refused".into()));
        }

        let start = (request.page as usize - 1) * request.limit as usize;
        let products = self
            .products
            .iter()
            .skip(start)
            .take(request.limit as usize)
            .cloned()
            .collect();
        Ok(ProductPage {
            products,
            total: self.products.len() as u64,
        })
    }

    async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        self.mutation()?;
        // The real remote always answers with the next free ID
        Ok(Product::from_draft(self.products.len() as i64 + 1, draft.clone()))
    }

    async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product> {
        self.mutation()?;
        Ok(Product::from_draft(id, draft.clone()))
    }

    async fn delete(&self, id: ProductId) -> Result<()> {
        self.mutation()?;
        self.deleted.lock().unwrap().push(id);
        Ok(())
    }
}

/// Auth endpoint accepting a single password.
pub struct FakeAuth {
    pub password: String,
    pub calls: AtomicUsize,
}

impl FakeAuth {
    pub fn new(password: &str) -> Self {
        Self {
            password: password.to_string(),
            calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl AuthApi for FakeAuth {
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if credentials.password == self.password {
            Ok(LoginResponse {
                token: format!("token-{}", credentials.username),
            })
        } else {
            Err(Error::Rejected {
                status: 401,
                context: "login".into(),
            })
        }
    }
}
