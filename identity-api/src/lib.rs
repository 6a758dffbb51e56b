pub mod endpoints;
mod error;
mod macros;
pub mod repositories;

pub use crate::error::{ErrorDetail, ErrorItem, ErrorResponse, IdentityApiError};
use repositories::*;
use tower_api_client::{Client as ApiClient, Request as ApiRequest};

pub const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";
pub const SECURE_TOKEN_URL: &str = "https://securetoken.googleapis.com/v1";

pub struct Client {
    inner: ApiClient,
}

impl Client {
    /// Client for the account endpoints (`accounts:*`)
    pub fn identity_toolkit() -> Self {
        Self::new(IDENTITY_TOOLKIT_URL)
    }

    /// Client for the token exchange endpoint
    pub fn secure_token() -> Self {
        Self::new(SECURE_TOKEN_URL)
    }

    /// Point the client at a custom base URL (emulator, proxy, ...)
    pub fn new(base_url: &str) -> Self {
        Self {
            inner: ApiClient::new(base_url.trim_end_matches('/')),
        }
    }

    pub async fn send<R>(&self, request: R) -> Result<R::Response, IdentityApiError>
    where
        R: ApiRequest,
    {
        self.inner.send(request).await.map_err(From::from)
    }
}

pub struct Request;

impl Request {
    pub fn new() -> Self {
        Self {}
    }

    pub fn accounts() -> AccountRepository {
        AccountRepository::new()
    }

    pub fn token() -> TokenRepository {
        TokenRepository::new()
    }
}
