use base64::Engine;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;

/// A freshly issued id token / refresh token pair
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
struct IdTokenGrant {
    uid: String,
    issued_at: DateTime<Utc>,
}

/// Opaque tokens handed out by the emulator
pub struct TokenStore {
    id_tokens: Arc<DashMap<String, IdTokenGrant>>,
    refresh_tokens: DashMap<String, String>,
    ttl: Duration,
}

impl TokenStore {
    pub fn new(ttl_seconds: u64) -> Self {
        let store = Self {
            id_tokens: Arc::new(DashMap::new()),
            refresh_tokens: DashMap::new(),
            ttl: Duration::from_secs(ttl_seconds),
        };

        // Spawn background cleanup task
        let id_tokens = store.id_tokens.clone();
        let ttl = store.ttl;
        tokio::spawn(async move {
            cleanup_expired_tokens(id_tokens, ttl).await;
        });

        tracing::info!(
            "Token store initialized with TTL of {} seconds",
            ttl_seconds
        );
        store
    }

    /// Issue a new id token and refresh token for `uid`
    pub fn issue(&self, uid: &str) -> IssuedTokens {
        let refresh_token = generate_token();
        self.refresh_tokens
            .insert(refresh_token.clone(), uid.to_string());
        let id_token = self.issue_id_token(uid);
        tracing::debug!(uid = %uid, "Issued tokens");
        IssuedTokens {
            id_token,
            refresh_token,
            expires_in: self.ttl.as_secs(),
        }
    }

    /// Exchange a refresh token for a new id token. Refresh tokens stay valid.
    pub fn exchange(&self, refresh_token: &str) -> Option<(String, IssuedTokens)> {
        let uid = self.refresh_tokens.get(refresh_token)?.value().clone();
        let id_token = self.issue_id_token(&uid);
        tracing::debug!(uid = %uid, "Exchanged refresh token");
        Some((
            uid,
            IssuedTokens {
                id_token,
                refresh_token: refresh_token.to_string(),
                expires_in: self.ttl.as_secs(),
            },
        ))
    }

    /// Uid behind an unexpired id token
    pub fn verify_id_token(&self, id_token: &str) -> Option<String> {
        let grant = self.id_tokens.get(id_token)?;
        if is_expired(&grant, self.ttl, Utc::now()) {
            return None;
        }
        Some(grant.uid.clone())
    }

    /// Forget every token issued to `uid`
    pub fn revoke_user(&self, uid: &str) {
        self.id_tokens.retain(|_, grant| grant.uid != uid);
        self.refresh_tokens.retain(|_, owner| owner != uid);
        tracing::debug!(uid = %uid, "Revoked tokens");
    }

    /// Number of live id tokens (for monitoring)
    pub fn token_count(&self) -> usize {
        self.id_tokens.len()
    }

    fn issue_id_token(&self, uid: &str) -> String {
        let id_token = generate_token();
        self.id_tokens.insert(
            id_token.clone(),
            IdTokenGrant {
                uid: uid.to_string(),
                issued_at: Utc::now(),
            },
        );
        id_token
    }
}

fn generate_token() -> String {
    let mut rng = rand::rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.random()).collect();
    base64::prelude::BASE64_URL_SAFE_NO_PAD.encode(&random_bytes)
}

fn is_expired(grant: &IdTokenGrant, ttl: Duration, now: DateTime<Utc>) -> bool {
    let age = now
        .signed_duration_since(grant.issued_at)
        .to_std()
        .unwrap_or(Duration::ZERO);
    age >= ttl
}

/// Background task that periodically drops expired id tokens
async fn cleanup_expired_tokens(id_tokens: Arc<DashMap<String, IdTokenGrant>>, ttl: Duration) {
    let mut interval = tokio::time::interval(Duration::from_secs(60));
    loop {
        interval.tick().await;
        let now = Utc::now();
        let initial_count = id_tokens.len();

        id_tokens.retain(|_, grant| !is_expired(grant, ttl, now));

        let cleaned = initial_count.saturating_sub(id_tokens.len());
        if cleaned > 0 {
            tracing::info!(
                "Cleaned up {} expired id tokens, {} remaining",
                cleaned,
                id_tokens.len()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn issued_tokens_verify() {
        let store = TokenStore::new(3600);
        let tokens = store.issue("uid-1");
        assert_eq!(tokens.expires_in, 3600);
        assert_ne!(tokens.id_token, tokens.refresh_token);
        assert_eq!(store.verify_id_token(&tokens.id_token).as_deref(), Some("uid-1"));
        assert_eq!(store.verify_id_token("forged"), None);
    }

    #[tokio::test]
    async fn exchange_issues_new_id_token() {
        let store = TokenStore::new(3600);
        let tokens = store.issue("uid-1");
        let (uid, fresh) = store.exchange(&tokens.refresh_token).unwrap();
        assert_eq!(uid, "uid-1");
        assert_ne!(fresh.id_token, tokens.id_token);
        assert_eq!(fresh.refresh_token, tokens.refresh_token);
        assert!(store.exchange("unknown").is_none());
    }

    #[tokio::test]
    async fn zero_ttl_tokens_are_expired() {
        let store = TokenStore::new(0);
        let tokens = store.issue("uid-1");
        assert_eq!(store.verify_id_token(&tokens.id_token), None);
    }

    #[tokio::test]
    async fn revoke_forgets_user_tokens() {
        let store = TokenStore::new(3600);
        let ada = store.issue("ada");
        let bob = store.issue("bob");
        store.revoke_user("ada");
        assert_eq!(store.verify_id_token(&ada.id_token), None);
        assert!(store.exchange(&ada.refresh_token).is_none());
        assert_eq!(store.verify_id_token(&bob.id_token).as_deref(), Some("bob"));
        assert_eq!(store.token_count(), 1);
    }

    #[test]
    fn tokens_are_url_safe() {
        let token = generate_token();
        assert_eq!(token.len(), 43);
        assert!(token
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }
}
