//! Session management.
//!
//! The auth endpoint only hands out a token, so the profile shown to the
//! user is synthesized from the username. Sessions survive restarts through
//! [`Storage`](crate::storage::Storage) and are checked once at startup by
//! [`SessionManager::restore`].

use crate::error::Result;
use crate::remote::AuthApi;
use crate::storage::{load_json, remove_key, store_json, OverlayStore, SharedStorage};
use catalog_engine::{Credentials, Validate};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

/// Key holding the raw auth token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the JSON-encoded [`UserProfile`].
pub const USER_KEY: &str = "user";

const PLACEHOLDER_AVATAR: &str = "https://via.placeholder.com/150";

/// The signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: String,
    pub image: String,
    pub token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    /// Build the profile for a user who just logged in.
    pub fn synthesize(username: &str, token: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: 1,
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            gender: "male".to_string(),
            image: PLACEHOLDER_AVATAR.to_string(),
            token: token.into(),
            logged_in_at: Some(now),
        }
    }
}

/// Answers whether mutations are allowed.
pub trait SessionGate: Send + Sync {
    fn is_authenticated(&self) -> bool;
}

/// Owns the current session and its persisted copy.
pub struct SessionManager {
    auth: Arc<dyn AuthApi>,
    storage: SharedStorage,
    overlay: OverlayStore,
    current: watch::Sender<Option<UserProfile>>,
}

impl SessionManager {
    pub fn new(auth: Arc<dyn AuthApi>, storage: SharedStorage) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            auth,
            overlay: OverlayStore::new(storage.clone()),
            storage,
            current,
        }
    }

    /// Load the persisted session.
    ///
    /// The session is accepted only when the stored profile carries the
    /// stored token. Anything else clears both keys.
    pub fn restore(&self) -> Option<UserProfile> {
        let token = self.storage.get(TOKEN_KEY);
        let user: Option<UserProfile> = load_json(self.storage.as_ref(), USER_KEY);

        let restored = match (token, user) {
            (Some(token), Some(user)) if user.token == token => Some(user),
            (None, None) if self.storage.get(USER_KEY).is_none() => None,
            _ => {
                tracing::warn!("Stored session is inconsistent, clearing it");
                self.forget_session();
                None
            }
        };

        if let Some(user) = &restored {
            tracing::info!(username = %user.username, "Session restored");
        }
        self.current.send_replace(restored.clone());
        restored
    }

    /// Authenticate and persist a new session.
    ///
    /// Credentials are validated before anything is sent. A failed login
    /// leaves no one signed in.
    pub async fn login(&self, credentials: &Credentials) -> Result<UserProfile> {
        credentials.validate()?;

        let response = match self.auth.login(credentials).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(username = %credentials.username, error = %e, "Login failed");
                self.current.send_replace(None);
                return Err(e);
            }
        };

        let user = UserProfile::synthesize(&credentials.username, response.token, Utc::now());
        if let Err(e) = self.storage.set(TOKEN_KEY, &user.token) {
            tracing::error!(key = TOKEN_KEY, error = %e, "Failed to persist value");
        }
        store_json(self.storage.as_ref(), USER_KEY, &user);

        tracing::info!(username = %user.username, "Logged in");
        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    /// Sign out and drop every local change.
    pub fn logout(&self) {
        self.forget_session();
        self.overlay.clear();
        self.current.send_replace(None);
        tracing::info!("Logged out");
    }

    pub fn current(&self) -> Option<UserProfile> {
        self.current.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.current.borrow().as_ref().map(|user| user.token.clone())
    }

    /// Watch the signed-in user.
    pub fn subscribe(&self) -> watch::Receiver<Option<UserProfile>> {
        self.current.subscribe()
    }

    fn forget_session(&self) {
        remove_key(self.storage.as_ref(), TOKEN_KEY);
        remove_key(self.storage.as_ref(), USER_KEY);
    }
}

impl SessionGate for SessionManager {
    fn is_authenticated(&self) -> bool {
        self.current
            .borrow()
            .as_ref()
            .is_some_and(|user| !user.token.is_empty())
    }
}

impl std::fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("current", &*self.current.borrow())
            .finish_non_exhaustive()
    }
}
