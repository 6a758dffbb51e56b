mod accounts;
mod sign_in;
mod token;

pub use accounts::{lookup, update_account};
pub use sign_in::sign_in_with_password;
pub use token::refresh_token;

use axum::{extract::State, Json};

use crate::emulator::{error::ServerError, models::HealthResponse, AppState};

pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        accounts: state.accounts.len(),
        active_tokens: state.tokens.token_count(),
    })
}

/// Every provider endpoint requires the `key` query parameter
pub(crate) fn require_api_key(key: Option<&str>) -> Result<(), ServerError> {
    match key {
        Some(key) if !key.trim().is_empty() => Ok(()),
        _ => Err(ServerError::BadRequest("MISSING_API_KEY".to_string())),
    }
}
