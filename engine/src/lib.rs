//! # Catalog Engine
//!
//! Deterministic overlay rules for a product catalog backed by a read-only
//! remote API.
//!
//! The remote catalog accepts mutations but never persists them. This crate
//! holds the local side of the story: the product model, draft validation,
//! and the overlay of local deletes, edits and additions that is merged over
//! every page fetched from the remote.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about HTTP, files or timers
//! - **Deterministic**: the same overlay and page always merge to the same list
//! - **Testable**: pure functions, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Products and drafts
//!
//! A [`Product`] is what the remote returns and what the user sees. A
//! [`ProductDraft`] is the user-editable subset submitted by create and
//! update forms. Drafts are checked with [`Validate`] before anything leaves
//! the process.
//!
//! ### Overlay
//!
//! The [`Overlay`] holds three independent collections keyed by product ID:
//! - deleted IDs, never shown again
//! - modified products, replacing whatever the remote returns
//! - added products, created locally and always listed first
//!
//! ### Merging
//!
//! The [`Merger`] applies an overlay to a freshly fetched page, either
//! replacing the visible list or appending to it without duplicates.
//!
//! ### Identifiers
//!
//! Remote products have positive IDs. [`LocalIdSource`] hands out strictly
//! decreasing negative IDs for local products so the two spaces never meet.
//!
//! ## Quick Start
//!
//! ```rust
//! use catalog_engine::{Category, Merger, Overlay, Product, ProductDraft};
//!
//! let remote = vec![
//!     Product::from_draft(1, ProductDraft::new("Lamp", 12.5, "A bright desk lamp", Category::Electronics, "https://img/1.png")),
//!     Product::from_draft(2, ProductDraft::new("Ring", 99.0, "A silver ring set", Category::Jewelery, "https://img/2.png")),
//! ];
//!
//! let mut overlay = Overlay::new();
//! overlay.record_deleted(1);
//!
//! let merged = Merger::new(&overlay).replace(remote);
//! assert_eq!(merged.ids(), vec![2]);
//! ```

pub mod credentials;
pub mod error;
pub mod ids;
pub mod merge;
pub mod overlay;
pub mod pagination;
pub mod product;
pub mod validation;

// Re-export main types at crate root
pub use credentials::Credentials;
pub use error::Error;
pub use ids::LocalIdSource;
pub use merge::{MergeMode, MergeResult, Merger};
pub use overlay::{DeleteOutcome, Overlay};
pub use pagination::{PageRequest, Pagination, DEFAULT_PAGE_SIZE};
pub use product::{Category, Origin, Product, ProductDraft, Rating};
pub use validation::{Field, FieldError, Validate};

/// Type aliases for clarity
pub type ProductId = i64;
pub type PageNumber = u32;
pub type PageSize = u32;
/// Milliseconds since the Unix epoch.
pub type Timestamp = u64;
