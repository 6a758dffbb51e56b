use axum::{
    extract::{Query, State},
    Json,
};
use identity_api::endpoints::{accounts::SignInResponse, ExpiresIn};

use super::require_api_key;
use crate::emulator::{
    error::ServerError,
    models::{ApiKeyParams, SignInRequest},
    AppState,
};

pub async fn sign_in_with_password(
    State(state): State<AppState>,
    Query(params): Query<ApiKeyParams>,
    Json(req): Json<SignInRequest>,
) -> Result<Json<SignInResponse>, ServerError> {
    require_api_key(params.key.as_deref())?;

    let user = state
        .accounts
        .verify_password(&req.email, &req.password)
        .inspect_err(|e| {
            tracing::info!(email = %req.email, "Sign in rejected: {}", e);
        })?;
    let tokens = state.tokens.issue(&user.local_id);

    tracing::info!(uid = %user.local_id, "Signed in");

    Ok(Json(SignInResponse {
        local_id: user.local_id,
        email: user.email,
        display_name: user.display_name,
        id_token: tokens.id_token,
        refresh_token: tokens.refresh_token,
        expires_in: ExpiresIn::new(tokens.expires_in),
        registered: true,
    }))
}
