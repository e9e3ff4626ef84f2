//! Configuration management for the client.

use catalog_engine::{PageSize, DEFAULT_PAGE_SIZE};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Base URL for auth and mutations.
pub const DEFAULT_API_URL: &str = "https://fakestoreapi.com";

/// Base URL for the paginated product list.
pub const DEFAULT_LIST_URL: &str = "https://fakestoreapi.in/api";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Auth and mutation endpoint base URL
    pub api_url: String,
    /// Paginated list endpoint base URL
    pub list_url: String,
    /// Page size used by refresh and reset
    pub page_size: PageSize,
    /// Per-request timeout
    pub timeout: Duration,
    /// Directory for file-backed storage
    pub profile_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            list_url: DEFAULT_LIST_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            profile_dir: default_profile_dir(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is read first when present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let api_url = match lookup("CATALOG_API_URL") {
            Some(url) => parse_url("CATALOG_API_URL", &url)?,
            None => defaults.api_url,
        };

        let list_url = match lookup("CATALOG_LIST_URL") {
            Some(url) => parse_url("CATALOG_LIST_URL", &url)?,
            None => defaults.list_url,
        };

        let page_size = match lookup("CATALOG_PAGE_SIZE") {
            Some(raw) => raw
                .trim()
                .parse::<PageSize>()
                .ok()
                .filter(|size| *size > 0)
                .ok_or(ConfigError::InvalidPageSize(raw))?,
            None => defaults.page_size,
        };

        let timeout = match lookup("CATALOG_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::InvalidTimeout(raw))?,
            None => defaults.timeout,
        };

        let profile_dir = lookup("CATALOG_PROFILE_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or(defaults.profile_dir);

        Ok(Self {
            api_url,
            list_url,
            page_size,
            timeout,
            profile_dir,
        })
    }

    /// Full URL for an auth or mutation path.
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Full URL for a list path.
    pub fn list_url(&self, path: &str) -> String {
        format!("{}{}", self.list_url, path)
    }
}

fn parse_url(var: &'static str, raw: &str) -> Result<String, ConfigError> {
    let url = raw.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        Ok(url.to_string())
    } else {
        Err(ConfigError::InvalidUrl {
            var,
            value: raw.to_string(),
        })
    }
}

fn default_profile_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(env::temp_dir)
        .join("catalog")
}

/// Configuration errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must be an http(s) URL, got '{value}'")]
    InvalidUrl { var: &'static str, value: String },

    #[error("Invalid CATALOG_PAGE_SIZE value '{0}'")]
    InvalidPageSize(String),

    #[error("Invalid CATALOG_TIMEOUT_SECS value '{0}'")]
    InvalidTimeout(String),
}
