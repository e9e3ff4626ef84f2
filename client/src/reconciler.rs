//! Catalog reconciler.
//!
//! Keeps the effective product list in sync with the remote catalog and the
//! local overlay. Every operation that talks to the remote first awaits the
//! call, then loads the overlay, applies its change, persists it and updates
//! the list inside one critical section. The lock is never held across an
//! `.await`.
//!
//! At most one fetch runs at a time. A fetch started while another is in
//! flight fails with [`Error::Busy`] without touching state. Mutations are
//! not serialized; overlay writes are idempotent and the last writer wins on
//! the list.

use crate::error::{Error, Result};
use crate::remote::CatalogApi;
use crate::session::SessionGate;
use crate::state::CatalogState;
use crate::storage::{OverlayStore, SharedStorage};
use catalog_engine::{
    DeleteOutcome, LocalIdSource, MergeMode, Merger, PageNumber, PageRequest, PageSize,
    Pagination, Product, ProductDraft, ProductId, Timestamp, Validate, DEFAULT_PAGE_SIZE,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

struct Inner {
    state: CatalogState,
    ids: LocalIdSource,
    /// Operations currently awaiting the remote
    in_flight: usize,
}

/// Reconciles remote pages with local changes.
///
/// `Send + Sync`; share it behind an `Arc`.
pub struct CatalogReconciler {
    api: Arc<dyn CatalogApi>,
    store: OverlayStore,
    session: Option<Arc<dyn SessionGate>>,
    page_size: PageSize,
    inner: Mutex<Inner>,
    state_tx: watch::Sender<CatalogState>,
    fetching: AtomicBool,
}

impl CatalogReconciler {
    /// Create a reconciler over `api` persisting its overlay in `storage`.
    pub fn new(api: Arc<dyn CatalogApi>, storage: SharedStorage) -> Self {
        let store = OverlayStore::new(storage);
        let ids = LocalIdSource::seeded(store.load().added_ids());
        let state = CatalogState::new(DEFAULT_PAGE_SIZE);
        let (state_tx, _) = watch::channel(state.clone());

        Self {
            api,
            store,
            session: None,
            page_size: DEFAULT_PAGE_SIZE,
            inner: Mutex::new(Inner {
                state,
                ids,
                in_flight: 0,
            }),
            state_tx,
            fetching: AtomicBool::new(false),
        }
    }

    /// Require an authenticated session for create, update and delete.
    pub fn with_session(mut self, session: Arc<dyn SessionGate>) -> Self {
        self.session = Some(session);
        self
    }

    /// Page size for [`Self::refresh`] and [`Self::reset`]. Zero is ignored.
    pub fn with_page_size(mut self, page_size: PageSize) -> Self {
        if page_size > 0 {
            self.page_size = page_size;
            self.modify(|inner| inner.state.pagination = Pagination::initial(page_size));
        }
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Snapshot of the current state.
    pub fn state(&self) -> CatalogState {
        self.lock().state.clone()
    }

    pub fn products(&self) -> Vec<Product> {
        self.lock().state.products.clone()
    }

    pub fn pagination(&self) -> Pagination {
        self.lock().state.pagination
    }

    pub fn last_error(&self) -> Option<String> {
        self.lock().state.last_error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().state.loading
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// The overlay store backing this reconciler.
    pub fn overlay_store(&self) -> &OverlayStore {
        &self.store
    }

    pub fn clear_error(&self) {
        self.modify(|inner| inner.state.last_error = None);
    }

    /// Watch every state change.
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state_tx.subscribe()
    }

    // ========================================================================
    // Fetching
    // ========================================================================

    /// Fetch one page and merge it with the overlay.
    ///
    /// Replaces the list, or appends to it when `append` is set. Failure
    /// leaves the list and pagination untouched.
    pub async fn fetch(&self, page: PageNumber, limit: PageSize, append: bool) -> Result<()> {
        let request = PageRequest::new(page, limit)?;

        let Some(_slot) = FetchSlot::acquire(&self.fetching) else {
            tracing::debug!(page, limit, "Fetch rejected, another one is in flight");
            return Err(Error::Busy);
        };
        let _loading = self.begin();

        let fetched = match self.api.list(request).await {
            Ok(fetched) => fetched,
            Err(e) => return Err(self.fail(e)),
        };

        let mode = MergeMode::from_append(append);
        let count = self.modify(|inner| {
            let overlay = self.store.load();
            let merged = Merger::new(&overlay).merge(mode, &inner.state.products, fetched.products);
            tracing::debug!(
                hidden = merged.hidden,
                replaced = merged.replaced,
                duplicates = merged.duplicates,
                "Merged page with overlay"
            );

            inner.state.products = merged.products;
            inner.state.pagination = Pagination::from_total(request, fetched.total);
            inner.state.products.len()
        });

        tracing::info!(page, limit, append, count, total = fetched.total, "Products fetched");
        Ok(())
    }

    /// Append the next page, if there is one and no fetch is running.
    ///
    /// Returns whether a page was fetched.
    pub async fn load_more(&self) -> Result<bool> {
        if self.fetching.load(Ordering::Acquire) {
            return Ok(false);
        }
        let Some(next) = self.pagination().next_page() else {
            return Ok(false);
        };

        match self.fetch(next.page, next.limit, true).await {
            Ok(()) => Ok(true),
            Err(Error::Busy) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Fetch the first page again.
    pub async fn refresh(&self) -> Result<()> {
        let limit = self.pagination().limit;
        self.fetch(1, limit, false).await
    }

    /// Drop every local change and fetch the first page.
    pub async fn reset(&self) -> Result<()> {
        self.store.clear();
        tracing::info!("Local changes cleared");
        self.fetch(1, self.page_size, false).await
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create a product.
    ///
    /// The remote only acknowledges the request; the product is kept locally
    /// under a fresh negative ID and shown first.
    pub async fn create(&self, draft: &ProductDraft) -> Result<Product> {
        self.ensure_authenticated()?;
        draft.validate()?;

        let _loading = self.begin();
        if let Err(e) = self.api.create(draft).await {
            return Err(self.fail(e));
        }

        let product = self.modify(|inner| {
            let mut overlay = self.store.load();
            for id in overlay.added_ids() {
                inner.ids.observe(id);
            }
            let product = Product::from_draft(inner.ids.next(now_millis()), draft.clone());

            overlay.record_added(product.clone());
            self.store.save(&overlay);

            inner.state.products.retain(|p| p.id != product.id);
            inner.state.products.insert(0, product.clone());
            product
        });

        tracing::info!(id = product.id, title = %product.title, "Product created");
        Ok(product)
    }

    /// Replace the editable fields of a listed product.
    ///
    /// The previously shown rating is kept. The remote echo is ignored.
    pub async fn update(&self, id: ProductId, draft: &ProductDraft) -> Result<Product> {
        self.ensure_authenticated()?;
        draft.validate()?;

        let rating = self
            .lock()
            .state
            .get(id)
            .map(|p| p.rating)
            .ok_or(Error::UnknownProduct(id))?;

        let _loading = self.begin();
        if let Err(e) = self.api.update(id, draft).await {
            return Err(self.fail(e));
        }

        let product = Product::from_draft(id, draft.clone()).with_rating(rating);
        self.modify(|inner| {
            let mut overlay = self.store.load();
            if overlay.record_modified(product.clone()) {
                self.store.save(&overlay);
            } else {
                tracing::debug!(id, "Product was deleted while updating");
            }

            if let Some(slot) = inner.state.products.iter_mut().find(|p| p.id == id) {
                *slot = product.clone();
            }
        });

        tracing::info!(id, "Product updated");
        Ok(product)
    }

    /// Delete a product and hide it from every future fetch.
    pub async fn delete(&self, id: ProductId) -> Result<DeleteOutcome> {
        self.ensure_authenticated()?;

        let _loading = self.begin();
        if let Err(e) = self.api.delete(id).await {
            return Err(self.fail(e));
        }

        let outcome = self.modify(|inner| {
            let mut overlay = self.store.load();
            let outcome = overlay.record_deleted(id);
            self.store.save(&overlay);

            inner.state.products.retain(|p| p.id != id);
            outcome
        });

        tracing::info!(id, ?outcome, "Product deleted");
        Ok(outcome)
    }

    // ========================================================================
    // Internals
    // ========================================================================

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` under the lock and publish the resulting state.
    fn modify<R>(&self, f: impl FnOnce(&mut Inner) -> R) -> R {
        let mut inner = self.lock();
        let result = f(&mut inner);
        self.state_tx.send_replace(inner.state.clone());
        result
    }

    fn ensure_authenticated(&self) -> Result<()> {
        match &self.session {
            Some(session) if !session.is_authenticated() => Err(Error::Unauthenticated),
            _ => Ok(()),
        }
    }

    /// Mark an operation as started and clear the previous error.
    fn begin(&self) -> LoadingGuard<'_> {
        self.modify(|inner| {
            inner.in_flight += 1;
            inner.state.loading = true;
            inner.state.last_error = None;
        });
        LoadingGuard { reconciler: self }
    }

    /// Record a remote failure and hand the error back.
    fn fail(&self, err: Error) -> Error {
        tracing::warn!(error = %err, "Catalog operation failed");
        self.modify(|inner| inner.state.last_error = Some(err.to_string()));
        err
    }
}

impl std::fmt::Debug for CatalogReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogReconciler")
            .field("page_size", &self.page_size)
            .field("fetching", &self.fetching.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

/// Holds the single fetch slot until dropped.
struct FetchSlot<'a>(&'a AtomicBool);

impl<'a> FetchSlot<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for FetchSlot<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Clears the loading flag once the last running operation finishes.
struct LoadingGuard<'a> {
    reconciler: &'a CatalogReconciler,
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.reconciler.modify(|inner| {
            inner.in_flight = inner.in_flight.saturating_sub(1);
            inner.state.loading = inner.in_flight > 0;
        });
    }
}

fn now_millis() -> Timestamp {
    u64::try_from(chrono::Utc::now().timestamp_millis()).unwrap_or_default()
}
