//! Local stand-in for the hosted identity provider.
//!
//! Speaks the same REST shapes as the Identity Toolkit and Secure Token
//! endpoints so [`RestIdentityProvider`](crate::RestIdentityProvider) can be
//! pointed at it during development and in integration tests.

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

pub use config::Configuration;
pub use error::ServerError;

use axum::{
    routing::{get, patch, post},
    Router,
};
use services::{AccountStore, TokenStore};
use std::sync::Arc;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

const MAX_BODY_BYTES: usize = 64 * 1024;
const MAX_CONCURRENT_REQUESTS: usize = 256;

#[derive(Clone)]
pub struct AppState {
    pub accounts: Arc<AccountStore>,
    pub tokens: Arc<TokenStore>,
}

impl AppState {
    /// Must be called inside a tokio runtime (the token store spawns its cleanup task)
    pub fn from_configuration(configuration: &Configuration) -> Self {
        Self {
            accounts: Arc::new(AccountStore::new(&configuration.accounts)),
            tokens: Arc::new(TokenStore::new(configuration.server.token_ttl_seconds)),
        }
    }
}

/// Serve the emulator on an already bound listener until the task is dropped
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .route(
            "/identitytoolkit.googleapis.com/v1/accounts:signInWithPassword",
            post(handlers::sign_in_with_password),
        )
        .route(
            "/identitytoolkit.googleapis.com/v1/accounts:lookup",
            post(handlers::lookup),
        )
        .route(
            "/securetoken.googleapis.com/v1/token",
            post(handlers::refresh_token),
        )
        .route(
            "/emulator/v1/accounts/{uid}",
            patch(handlers::update_account),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(ConcurrencyLimitLayer::new(MAX_CONCURRENT_REQUESTS))
        .with_state(state)
}
