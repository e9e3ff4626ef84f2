//! Unified error handling for the client.

use crate::config::ConfigError;
use catalog_engine::ProductId;

/// Client error type.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    #[error("{0}")]
    Engine(#[from] catalog_engine::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("{context} failed with status {status}")]
    Rejected { status: u16, context: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Not authenticated")]
    Unauthenticated,

    #[error("Another fetch is already in progress")]
    Busy,

    #[error("Product {0} is not in the current list")]
    UnknownProduct(ProductId),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Whether the remote answered at all.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Error::Network(_) | Error::Rejected { .. } | Error::Decode(_)
        )
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode(err.to_string())
        } else if let Some(status) = err.status() {
            Error::Rejected {
                status: status.as_u16(),
                context: err
                    .url()
                    .map(|url| url.path().to_string())
                    .unwrap_or_else(|| "request".to_string()),
            }
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
