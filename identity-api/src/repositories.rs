use crate::endpoints::{
    ApiKey,
    accounts::{Lookup, SignInWithPassword},
    token::RefreshIdToken,
};
use secrecy::SecretString;

#[derive(Default)]
pub struct AccountRepository {
    api_key: ApiKey,
}

impl AccountRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn sign_in_with_password(
        &self,
        email: impl Into<String>,
        password: SecretString,
    ) -> SignInWithPassword {
        SignInWithPassword::new(self.api_key.clone(), email, password)
    }

    pub fn lookup(&self, id_token: impl Into<String>) -> Lookup {
        Lookup::new(self.api_key.clone(), id_token)
    }
}

#[derive(Default)]
pub struct TokenRepository {
    api_key: ApiKey,
}

impl TokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_api_key(mut self, api_key: impl Into<ApiKey>) -> Self {
        self.api_key = api_key.into();
        self
    }

    pub fn refresh(&self, refresh_token: impl Into<String>) -> RefreshIdToken {
        RefreshIdToken::new(self.api_key.clone(), refresh_token)
    }
}
