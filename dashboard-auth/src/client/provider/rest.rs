use chrono::{DateTime, Duration, Utc};
use identity_api::{endpoints::ApiKey, Client, IdentityApiError, Request};
use secrecy::{ExposeSecret, SecretString};
use std::sync::Mutex;

use super::{lock, IdentityProvider, ListenerRegistry, ProviderError, Subscription};
use crate::client::config::AuthSettings;
use crate::common::Identity;

/// Refresh id tokens this long before they actually expire
const EXPIRY_BUFFER: Duration = Duration::minutes(5);

struct ProviderSession {
    identity: Identity,
    id_token: SecretString,
    refresh_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl ProviderSession {
    fn is_expiring(&self) -> bool {
        self.expires_at <= Utc::now() + EXPIRY_BUFFER
    }
}

/// [`IdentityProvider`] backed by the provider's REST API
pub struct RestIdentityProvider {
    accounts: Client,
    tokens: Client,
    api_key: ApiKey,
    session: Mutex<Option<ProviderSession>>,
    listeners: ListenerRegistry,
}

impl RestIdentityProvider {
    pub fn new(accounts: Client, tokens: Client, api_key: impl Into<ApiKey>) -> Self {
        Self {
            accounts,
            tokens,
            api_key: api_key.into(),
            session: Mutex::new(None),
            listeners: ListenerRegistry::new(),
        }
    }

    pub fn from_settings(settings: &AuthSettings) -> Self {
        Self::new(
            Client::new(&settings.identity_url),
            Client::new(&settings.token_url),
            settings.api_key.as_str(),
        )
    }

    /// Refresh the session when its id token expires within the buffer window
    pub async fn refresh_if_needed(&self) -> Result<(), ProviderError> {
        let refresh_token = {
            let session = lock(&self.session);
            match session.as_ref() {
                Some(s) if s.is_expiring() => s.refresh_token.expose_secret().to_owned(),
                _ => return Ok(()),
            }
        };
        self.refresh_with(refresh_token).await
    }

    /// Unconditionally exchange the refresh token and re-read the identity
    pub async fn refresh(&self) -> Result<(), ProviderError> {
        let refresh_token = {
            let session = lock(&self.session);
            match session.as_ref() {
                Some(s) => s.refresh_token.expose_secret().to_owned(),
                None => return Ok(()),
            }
        };
        self.refresh_with(refresh_token).await
    }

    async fn refresh_with(&self, refresh_token: String) -> Result<(), ProviderError> {
        tracing::debug!("Refreshing id token");
        let req = Request::token()
            .with_api_key(self.api_key.clone())
            .refresh(refresh_token.clone());

        let resp = match self.tokens.send(req).await {
            Ok(resp) => resp,
            Err(e) => {
                // Only a definitive 4xx answer ends the session; outages keep it
                let definitive =
                    matches!(&e, IdentityApiError::Provider(status, _) if status.is_client_error());
                let err = map_api_error(e);
                if definitive {
                    self.end_session_if_current(&refresh_token, &err);
                }
                return Err(err);
            }
        };

        let identity = self.lookup(&resp.id_token).await?;
        let expires_at = expires_at(resp.expires_in.as_secs());

        let changed = {
            let mut session = lock(&self.session);
            match session.as_mut() {
                // Signed out or signed in again while the refresh was in flight
                Some(current)
                    if current.refresh_token.expose_secret() == refresh_token
                        && current.identity.id == resp.user_id =>
                {
                    let changed = current.identity != identity;
                    current.identity = identity.clone();
                    current.id_token = SecretString::from(resp.id_token);
                    current.refresh_token = SecretString::from(resp.refresh_token);
                    current.expires_at = expires_at;
                    changed
                }
                _ => {
                    tracing::debug!("Discarding refresh for a session that is no longer current");
                    return Ok(());
                }
            }
        };

        tracing::debug!(expires_at = %expires_at, "Id token refreshed");
        if changed {
            tracing::info!(user_id = %identity.id, "Identity changed after token refresh");
            self.listeners.notify(Some(identity));
        }
        Ok(())
    }

    async fn lookup(&self, id_token: &str) -> Result<Identity, ProviderError> {
        let req = Request::accounts()
            .with_api_key(self.api_key.clone())
            .lookup(id_token);
        let resp = self.accounts.send(req).await.map_err(map_api_error)?;

        resp.users
            .into_iter()
            .next()
            .map(Identity::from)
            .ok_or_else(|| ProviderError::MalformedResponse("lookup returned no users".into()))
    }

    /// End the session only if it is still the one `refresh_token` belongs to
    fn end_session_if_current(&self, refresh_token: &str, err: &ProviderError) {
        let previous = {
            let mut session = lock(&self.session);
            let is_current = session
                .as_ref()
                .is_some_and(|current| current.refresh_token.expose_secret() == refresh_token);
            if is_current {
                session.take()
            } else {
                None
            }
        };
        match previous {
            Some(_) => {
                tracing::warn!("Token refresh rejected, ending session: {}", err);
                self.listeners.notify(None);
            }
            None => {
                tracing::debug!("Ignoring rejected refresh for a session that is no longer current")
            }
        }
    }

    fn end_session(&self) {
        let previous = lock(&self.session).take();
        if previous.is_some() {
            self.listeners.notify(None);
        }
    }
}

impl IdentityProvider for RestIdentityProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Identity, ProviderError> {
        tracing::debug!(email = %email, "Signing in with password");
        let req = Request::accounts()
            .with_api_key(self.api_key.clone())
            .sign_in_with_password(email, SecretString::from(password.expose_secret().to_owned()));
        let resp = self.accounts.send(req).await.map_err(map_api_error)?;

        let identity = self.lookup(&resp.id_token).await?;
        let session = ProviderSession {
            identity: identity.clone(),
            id_token: SecretString::from(resp.id_token),
            refresh_token: SecretString::from(resp.refresh_token),
            expires_at: expires_at(resp.expires_in.as_secs()),
        };
        *lock(&self.session) = Some(session);

        self.listeners.notify(Some(identity.clone()));
        Ok(identity)
    }

    fn on_auth_state_changed<F>(&self, listener: F) -> Subscription
    where
        F: FnMut(Option<Identity>) + Send + 'static,
    {
        // New listeners learn the current state right away
        self.listeners
            .register_and_deliver(listener, || self.current_identity())
    }

    fn current_identity(&self) -> Option<Identity> {
        lock(&self.session).as_ref().map(|s| s.identity.clone())
    }

    async fn sign_out(&self) {
        tracing::info!("Signing out");
        self.end_session();
    }

    async fn refresh_session(&self) -> Result<(), ProviderError> {
        self.refresh_if_needed().await
    }
}

fn expires_at(expires_in_secs: u64) -> DateTime<Utc> {
    let secs = i64::try_from(expires_in_secs).unwrap_or(i64::MAX);
    Duration::try_seconds(secs)
        .and_then(|lifetime| Utc::now().checked_add_signed(lifetime))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Human readable description for well-known provider error codes
fn describe(code: &str) -> Option<&'static str> {
    match code {
        "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS" => {
            Some("Invalid email or password")
        }
        "USER_DISABLED" => Some("This account has been disabled"),
        "TOO_MANY_ATTEMPTS_TRY_LATER" => Some("Too many attempts, try again later"),
        "INVALID_EMAIL" => Some("The email address is badly formatted"),
        "MISSING_PASSWORD" => Some("A password is required"),
        "USER_NOT_FOUND" => Some("This account no longer exists"),
        "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "INVALID_ID_TOKEN" => {
            Some("Your session has expired, please sign in again")
        }
        _ => None,
    }
}

pub(crate) fn map_api_error(err: IdentityApiError) -> ProviderError {
    match err {
        IdentityApiError::Provider(status, detail) => {
            let code = detail.reason_code().to_string();
            tracing::debug!(status = %status, code = %code, "Provider rejected request");
            let description = describe(&code)
                .map(str::to_string)
                .or_else(|| detail.detail().map(str::to_string));
            ProviderError::Rejected { code, description }
        }
        IdentityApiError::Internal(e) => {
            tracing::debug!("Provider request failed: {}", e);
            ProviderError::Network(format!("Network request failed: {}", e))
        }
    }
}
