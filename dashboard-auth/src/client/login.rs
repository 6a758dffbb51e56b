use secrecy::SecretString;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::sync::Arc;

use crate::client::provider::IdentityProvider;
use crate::client::storage::KeyValueStore;
use crate::common::{Identity, SessionSnapshot};

/// Message returned when the provider's error carries no description
pub const FALLBACK_SIGN_IN_MESSAGE: &str = "Login failed";

/// Outcome of a sign-in attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignInResult {
    Success { identity: Identity },
    Failure { message: String },
}

impl SignInResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SignInResult::Success { .. })
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            SignInResult::Success { identity } => Some(identity),
            SignInResult::Failure { .. } => None,
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            SignInResult::Failure { message } => Some(message),
            SignInResult::Success { .. } => None,
        }
    }
}

// {"success": true, "identity": {...}} / {"success": false, "message": "..."}
impl Serialize for SignInResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        match self {
            SignInResult::Success { identity } => {
                map.serialize_entry("success", &true)?;
                map.serialize_entry("identity", identity)?;
            }
            SignInResult::Failure { message } => {
                map.serialize_entry("success", &false)?;
                map.serialize_entry("message", message)?;
            }
        }
        map.end()
    }
}

/// Signs a user in and keeps a snapshot of the resulting identity.
pub struct SessionLogin<P, S> {
    provider: Arc<P>,
    store: Arc<S>,
}

impl<P, S> Clone for SessionLogin<P, S> {
    fn clone(&self) -> Self {
        Self {
            provider: self.provider.clone(),
            store: self.store.clone(),
        }
    }
}

impl<P, S> SessionLogin<P, S>
where
    P: IdentityProvider,
    S: KeyValueStore,
{
    pub fn new(provider: Arc<P>, store: Arc<S>) -> Self {
        Self { provider, store }
    }

    /// Sign in with email and password.
    ///
    /// Never fails: provider errors come back as [`SignInResult::Failure`].
    /// The snapshot is written only after the provider accepted the credentials.
    pub async fn sign_in(&self, email: &str, password: &SecretString) -> SignInResult {
        match self.provider.sign_in_with_password(email, password).await {
            Ok(identity) => {
                // Best effort: a failed write does not undo a successful sign-in
                if let Err(e) = SessionSnapshot::from(&identity).save(self.store.as_ref()) {
                    tracing::warn!(user_id = %identity.id, "Failed to persist session snapshot: {}", e);
                }
                tracing::info!(user_id = %identity.id, email = %email, "Signed in");
                SignInResult::Success { identity }
            }
            Err(e) => {
                tracing::warn!(email = %email, "Sign in failed: {}", e);
                let message = e
                    .description()
                    .map(str::to_string)
                    .unwrap_or_else(|| FALLBACK_SIGN_IN_MESSAGE.to_string());
                SignInResult::Failure { message }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::provider::{ListenerRegistry, ProviderError, Subscription};
    use crate::client::storage::{MemoryStore, StorageError};
    use crate::common::SNAPSHOT_KEY;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// Provider answering every sign-in with a canned result
    struct StubProvider {
        result: Result<Identity, ProviderError>,
        calls: Mutex<Vec<String>>,
        listeners: ListenerRegistry,
    }

    impl StubProvider {
        fn accepting(identity: Identity) -> Self {
            Self {
                result: Ok(identity),
                calls: Mutex::new(Vec::new()),
                listeners: ListenerRegistry::new(),
            }
        }

        fn failing(err: ProviderError) -> Self {
            Self {
                result: Err(err),
                calls: Mutex::new(Vec::new()),
                listeners: ListenerRegistry::new(),
            }
        }
    }

    impl IdentityProvider for StubProvider {
        async fn sign_in_with_password(
            &self,
            email: &str,
            _password: &SecretString,
        ) -> Result<Identity, ProviderError> {
            self.calls.lock().unwrap().push(email.to_string());
            self.result.clone()
        }

        fn on_auth_state_changed<F>(&self, listener: F) -> Subscription
        where
            F: FnMut(Option<Identity>) + Send + 'static,
        {
            self.listeners.register(listener)
        }

        fn current_identity(&self) -> Option<Identity> {
            None
        }

        async fn sign_out(&self) {}
    }

    /// Memory store that counts writes and can be told to fail them
    #[derive(Default)]
    struct CountingStore {
        inner: MemoryStore,
        writes: AtomicUsize,
        fail_writes: bool,
    }

    impl KeyValueStore for CountingStore {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
            self.writes.fetch_add(1, Ordering::SeqCst);
            if self.fail_writes {
                return Err(StorageError::Unavailable("disk full".into()));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove(key)
        }
    }

    fn identity() -> Identity {
        Identity {
            id: "uid-1".to_string(),
            email: Some("ada@example.com".to_string()),
            email_verified: true,
        }
    }

    fn password() -> SecretString {
        SecretString::from("correct horse".to_string())
    }

    #[tokio::test]
    async fn success_writes_exactly_one_snapshot() {
        let provider = Arc::new(StubProvider::accepting(identity()));
        let store = Arc::new(CountingStore::default());
        let login = SessionLogin::new(provider.clone(), store.clone());

        let result = login.sign_in("ada@example.com", &password()).await;

        assert_eq!(
            result,
            SignInResult::Success {
                identity: identity()
            }
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
        let stored: serde_json::Value =
            serde_json::from_str(&store.get(SNAPSHOT_KEY).unwrap().unwrap()).unwrap();
        assert_eq!(
            stored,
            serde_json::json!({
                "id": "uid-1",
                "email": "ada@example.com",
                "emailVerified": true,
            })
        );
        assert_eq!(*provider.calls.lock().unwrap(), vec!["ada@example.com"]);
    }

    #[tokio::test]
    async fn success_overwrites_previous_snapshot() {
        let store = Arc::new(CountingStore::default());
        store
            .inner
            .set(SNAPSHOT_KEY, r#"{"id":"old","email":null,"emailVerified":false}"#)
            .unwrap();
        let login = SessionLogin::new(Arc::new(StubProvider::accepting(identity())), store.clone());

        login.sign_in("ada@example.com", &password()).await;

        let snapshot = SessionSnapshot::load(store.as_ref()).unwrap().unwrap();
        assert_eq!(snapshot.id, "uid-1");
    }

    #[tokio::test]
    async fn failure_returns_provider_description_without_writing() {
        let provider = Arc::new(StubProvider::failing(ProviderError::Rejected {
            code: "INVALID_PASSWORD".into(),
            description: Some("Invalid email or password".into()),
        }));
        let store = Arc::new(CountingStore::default());
        let login = SessionLogin::new(provider, store.clone());

        let result = login.sign_in("ada@example.com", &password()).await;

        assert_eq!(
            result,
            SignInResult::Failure {
                message: "Invalid email or password".into()
            }
        );
        assert_eq!(store.writes.load(Ordering::SeqCst), 0);
        assert!(store.inner.is_empty());
    }

    #[tokio::test]
    async fn failure_without_description_uses_fallback() {
        for err in [
            ProviderError::Rejected {
                code: "OPERATION_NOT_ALLOWED".into(),
                description: None,
            },
            ProviderError::Rejected {
                code: "X".into(),
                description: Some(String::new()),
            },
            ProviderError::MalformedResponse("lookup returned no users".into()),
        ] {
            let login = SessionLogin::new(
                Arc::new(StubProvider::failing(err)),
                Arc::new(CountingStore::default()),
            );
            let result = login.sign_in("ada@example.com", &password()).await;
            assert_eq!(result.message(), Some(FALLBACK_SIGN_IN_MESSAGE));
        }
    }

    #[tokio::test]
    async fn network_failure_is_reported_not_raised() {
        let login = SessionLogin::new(
            Arc::new(StubProvider::failing(ProviderError::Network(
                "Network request failed".into(),
            ))),
            Arc::new(CountingStore::default()),
        );
        let result = login.sign_in("ada@example.com", &password()).await;
        assert!(!result.is_success());
        assert_eq!(result.message(), Some("Network request failed"));
    }

    #[tokio::test]
    async fn storage_failure_keeps_success() {
        let store = Arc::new(CountingStore {
            fail_writes: true,
            ..Default::default()
        });
        let login = SessionLogin::new(Arc::new(StubProvider::accepting(identity())), store.clone());

        let result = login.sign_in("ada@example.com", &password()).await;

        assert!(result.is_success());
        assert_eq!(store.writes.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn result_serializes_with_success_flag() {
        let ok = serde_json::to_value(SignInResult::Success {
            identity: identity(),
        })
        .unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["identity"]["id"], "uid-1");

        let failed = serde_json::to_value(SignInResult::Failure {
            message: FALLBACK_SIGN_IN_MESSAGE.into(),
        })
        .unwrap();
        assert_eq!(
            failed,
            serde_json::json!({"success": false, "message": "Login failed"})
        );
    }
}
