//! # Catalog Client
//!
//! Async client for a product catalog whose remote API acknowledges writes
//! but never keeps them.
//!
//! The [`CatalogReconciler`] fetches pages through a [`CatalogApi`], merges
//! them with the local overlay from [`catalog_engine`], and publishes the
//! effective list on a `watch` channel. Creates, edits and deletes are sent to
//! the remote, then recorded in the overlay so they survive every refetch.
//! The [`SessionManager`] handles login, persists the session and gates
//! mutations.
//!
//! ## Wiring
//!
//! ```no_run
//! use catalog_client::{
//!     CatalogReconciler, Config, FileStorage, HttpCatalogClient, SessionManager,
//! };
//! use std::sync::Arc;
//!
//! # async fn run() -> catalog_client::Result<()> {
//! let config = Config::from_env()?;
//! let http = Arc::new(HttpCatalogClient::new(&config)?);
//! let storage = Arc::new(FileStorage::new(&config.profile_dir));
//!
//! let session = Arc::new(SessionManager::new(http.clone(), storage.clone()));
//! session.restore();
//!
//! let catalog = CatalogReconciler::new(http, storage)
//!     .with_session(session)
//!     .with_page_size(config.page_size);
//! catalog.refresh().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod reconciler;
pub mod remote;
pub mod session;
pub mod state;
pub mod storage;

pub use config::{Config, ConfigError};
pub use error::{Error, Result};
pub use reconciler::CatalogReconciler;
pub use remote::{AuthApi, CatalogApi, HttpCatalogClient, LoginResponse, ProductPage};
pub use session::{SessionGate, SessionManager, UserProfile};
pub use state::CatalogState;
pub use storage::{FileStorage, MemoryStorage, OverlayStore, SharedStorage, Storage};
