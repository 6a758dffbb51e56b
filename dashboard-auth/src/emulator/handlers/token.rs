use axum::{
    extract::{Query, State},
    Json,
};
use identity_api::endpoints::{token::RefreshIdTokenResponse, ExpiresIn};

use super::require_api_key;
use crate::emulator::{
    error::ServerError,
    models::{ApiKeyParams, RefreshRequest},
    AppState,
};

pub async fn refresh_token(
    State(state): State<AppState>,
    Query(params): Query<ApiKeyParams>,
    Json(req): Json<RefreshRequest>,
) -> Result<Json<RefreshIdTokenResponse>, ServerError> {
    tracing::debug!("Token refresh requested");

    require_api_key(params.key.as_deref())?;
    if req.grant_type != "refresh_token" {
        return Err(ServerError::BadRequest("INVALID_GRANT_TYPE".to_string()));
    }
    if req.refresh_token.is_empty() {
        return Err(ServerError::BadRequest("MISSING_REFRESH_TOKEN".to_string()));
    }

    let (uid, tokens) = state
        .tokens
        .exchange(&req.refresh_token)
        .ok_or(ServerError::InvalidRefreshToken)?;
    // Disabled or deleted users cannot keep refreshing
    state.accounts.active_user(&uid)?;

    tracing::info!(uid = %uid, "Token refresh successful");

    Ok(Json(RefreshIdTokenResponse {
        expires_in: ExpiresIn::new(tokens.expires_in),
        token_type: "Bearer".to_string(),
        refresh_token: tokens.refresh_token,
        id_token: tokens.id_token,
        user_id: uid,
        project_id: None,
    }))
}
