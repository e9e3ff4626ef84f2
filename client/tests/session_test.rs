//! Integration tests for session handling.

mod common;

use catalog_client::{
    CatalogReconciler, Error, MemoryStorage, SessionGate, SessionManager, Storage, UserProfile,
};
use catalog_engine::Credentials;
use common::{init_tracing, shirt, FakeAuth, FakeCatalog};
use std::sync::atomic::Ordering;
use std::sync::Arc;

const PASSWORD: &str = "83r5^_";

fn setup() -> (Arc<FakeAuth>, MemoryStorage, SessionManager) {
    init_tracing();
    let auth = Arc::new(FakeAuth::new(PASSWORD));
    let storage = MemoryStorage::new();
    let manager = SessionManager::new(auth.clone(), Arc::new(storage.clone()));
    (auth, storage, manager)
}

#[cfg(test)]
mod login_tests {
    use super::*;

    #[tokio::test]
    async fn login_persists_session() {
        let (_, storage, manager) = setup();

        let user = manager
            .login(&Credentials::new("mor_2314", PASSWORD))
            .await
            .unwrap();

        assert_eq!(user.token, "token-mor_2314");
        assert_eq!(user.email, "mor_2314@example.com");
        assert!(manager.is_authenticated());
        assert_eq!(manager.token().as_deref(), Some("token-mor_2314"));
        assert_eq!(storage.get("token").as_deref(), Some("token-mor_2314"));

        let stored: UserProfile = serde_json::from_str(&storage.get("user").unwrap()).unwrap();
        assert_eq!(stored, user);
    }

    #[tokio::test]
    async fn invalid_credentials_never_reach_remote() {
        let (auth, _, manager) = setup();

        let err = manager
            .login(&Credentials::new("mo", PASSWORD))
            .await
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid username: Username must be at least 3 characters"
        );
        assert_eq!(auth.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejected_login_signs_out() {
        let (_, storage, manager) = setup();

        let err = manager
            .login(&Credentials::new("mor_2314", "wrong-password"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            Error::Rejected {
                status: 401,
                context: "login".into()
            }
        );
        assert!(!manager.is_authenticated());
        assert!(storage.is_empty());
    }

    #[tokio::test]
    async fn subscribers_see_login_and_logout() {
        let (_, _, manager) = setup();
        let mut rx = manager.subscribe();

        manager
            .login(&Credentials::new("johnd", PASSWORD))
            .await
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|u| u.username.clone()),
            Some("johnd".to_string())
        );

        manager.logout();
        rx.changed().await.unwrap();
        assert!(rx.borrow().is_none());
    }
}

#[cfg(test)]
mod restore_tests {
    use super::*;

    #[tokio::test]
    async fn restore_after_restart() {
        let (auth, storage, manager) = setup();
        let user = manager
            .login(&Credentials::new("johnd", PASSWORD))
            .await
            .unwrap();

        let restarted = SessionManager::new(auth, Arc::new(storage.clone()));
        assert!(!restarted.is_authenticated());
        assert_eq!(restarted.restore(), Some(user.clone()));
        assert_eq!(restarted.current(), Some(user));
    }

    #[test]
    fn restore_rejects_mismatched_token() {
        let (_, storage, manager) = setup();
        let user = UserProfile::synthesize("johnd", "stale", chrono::Utc::now());
        storage.set("token", "fresh").unwrap();
        storage
            .set("user", &serde_json::to_string(&user).unwrap())
            .unwrap();

        assert_eq!(manager.restore(), None);
        assert!(!storage.contains_key("token"));
        assert!(!storage.contains_key("user"));
    }

    #[test]
    fn restore_clears_corrupted_user() {
        let (_, storage, manager) = setup();
        storage.set("token", "abc").unwrap();
        storage.set("user", "{not json").unwrap();

        assert_eq!(manager.restore(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn restore_clears_half_session() {
        let (_, storage, manager) = setup();
        storage.set("token", "abc").unwrap();

        assert_eq!(manager.restore(), None);
        assert!(storage.is_empty());
    }

    #[test]
    fn restore_with_nothing_stored() {
        let (_, storage, manager) = setup();
        storage.set("deleted_product_ids", "[1]").unwrap();

        assert_eq!(manager.restore(), None);
        // Unrelated keys stay
        assert!(storage.contains_key("deleted_product_ids"));
    }
}

#[cfg(test)]
mod gate_tests {
    use super::*;

    #[tokio::test]
    async fn logout_clears_everything() {
        let (_, storage, manager) = setup();
        let session = Arc::new(manager);
        let reconciler = CatalogReconciler::new(
            Arc::new(FakeCatalog::with_count(6)),
            Arc::new(storage.clone()),
        )
        .with_session(session.clone());

        session
            .login(&Credentials::new("johnd", PASSWORD))
            .await
            .unwrap();
        reconciler.fetch(1, 6, false).await.unwrap();
        reconciler.create(&shirt()).await.unwrap();
        reconciler.delete(2).await.unwrap();
        reconciler.update(3, &shirt()).await.unwrap();
        storage.set("products_cache", "[]").unwrap();

        session.logout();

        assert!(storage.is_empty(), "left behind: {:?}", storage.keys());
        assert!(!session.is_authenticated());
        assert_eq!(
            reconciler.create(&shirt()).await,
            Err(Error::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn mutations_wait_for_login() {
        let (_, storage, manager) = setup();
        let session = Arc::new(manager);
        let catalog = Arc::new(FakeCatalog::with_count(6));
        let reconciler = CatalogReconciler::new(catalog.clone(), Arc::new(storage))
            .with_session(session.clone());

        // Reading does not need a session
        reconciler.fetch(1, 6, false).await.unwrap();
        assert_eq!(reconciler.delete(1).await, Err(Error::Unauthenticated));
        assert_eq!(catalog.mutation_calls.load(Ordering::SeqCst), 0);

        session
            .login(&Credentials::new("johnd", PASSWORD))
            .await
            .unwrap();
        reconciler.delete(1).await.unwrap();
        assert!(!reconciler.state().contains(1));
    }
}
