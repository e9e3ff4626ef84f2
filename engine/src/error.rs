//! Error types for the catalog engine.

use crate::{Field, PageNumber, PageSize};
use thiserror::Error;

/// All possible errors from the catalog engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    // Validation errors
    #[error("invalid {field}: {reason}")]
    Validation { field: Field, reason: String },

    // Paging errors
    #[error("invalid page request: page {page}, limit {limit}")]
    InvalidPage { page: PageNumber, limit: PageSize },
}

impl Error {
    /// The field a validation error refers to, if any.
    pub fn field(&self) -> Option<Field> {
        match self {
            Error::Validation { field, .. } => Some(*field),
            Error::InvalidPage { .. } => None,
        }
    }
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, Error>;
