use dashmap::DashMap;
use identity_api::endpoints::accounts::UserInfo;
use secrecy::{ExposeSecret, SecretString};
use uuid::Uuid;

use crate::emulator::config::SeedAccount;
use crate::emulator::error::ServerError;
use crate::emulator::models::{Account, AccountUpdate};

/// Accounts known to the emulator, keyed by uid
pub struct AccountStore {
    accounts: DashMap<String, Account>,
    uid_by_email: DashMap<String, String>,
}

impl AccountStore {
    pub fn new(seed: &[SeedAccount]) -> Self {
        let store = Self {
            accounts: DashMap::new(),
            uid_by_email: DashMap::new(),
        };
        for account in seed {
            store.insert(account);
        }
        tracing::info!("Account store seeded with {} accounts", store.len());
        store
    }

    pub fn insert(&self, seed: &SeedAccount) -> String {
        let uid = seed
            .uid
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        let email = normalize_email(&seed.email);

        self.uid_by_email.insert(email.clone(), uid.clone());
        self.accounts.insert(
            uid.clone(),
            Account {
                uid: uid.clone(),
                email,
                password: SecretString::from(seed.password.clone()),
                email_verified: seed.email_verified,
                disabled: seed.disabled,
            },
        );
        tracing::debug!(uid = %uid, "Account added");
        uid
    }

    /// Check credentials the way the hosted provider does
    pub fn verify_password(&self, email: &str, password: &str) -> Result<UserInfo, ServerError> {
        if email.trim().is_empty() {
            return Err(ServerError::BadRequest("INVALID_EMAIL".to_string()));
        }
        if password.is_empty() {
            return Err(ServerError::BadRequest("MISSING_PASSWORD".to_string()));
        }

        let uid = self
            .uid_by_email
            .get(&normalize_email(email))
            .map(|uid| uid.value().clone())
            .ok_or(ServerError::InvalidCredentials)?;
        let account = self
            .accounts
            .get(&uid)
            .ok_or(ServerError::InvalidCredentials)?;

        if account.password.expose_secret() != password {
            return Err(ServerError::InvalidCredentials);
        }
        if account.disabled {
            return Err(ServerError::UserDisabled);
        }
        Ok(account.user_info())
    }

    /// Current state of an account that is allowed to hold a session
    pub fn active_user(&self, uid: &str) -> Result<UserInfo, ServerError> {
        let account = self.accounts.get(uid).ok_or(ServerError::UserNotFound)?;
        if account.disabled {
            return Err(ServerError::UserDisabled);
        }
        Ok(account.user_info())
    }

    pub fn update(&self, uid: &str, update: &AccountUpdate) -> Result<UserInfo, ServerError> {
        let mut account = self
            .accounts
            .get_mut(uid)
            .ok_or(ServerError::UserNotFound)?;
        if let Some(email_verified) = update.email_verified {
            account.email_verified = email_verified;
        }
        if let Some(disabled) = update.disabled {
            account.disabled = disabled;
        }
        tracing::info!(uid = %uid, "Account updated");
        Ok(account.user_info())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
