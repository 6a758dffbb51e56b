use axum::{
    extract::{Path, Query, State},
    Json,
};
use identity_api::endpoints::accounts::{LookupResponse, UserInfo};

use super::require_api_key;
use crate::emulator::{
    error::ServerError,
    models::{AccountUpdate, ApiKeyParams, LookupRequest},
    AppState,
};

pub async fn lookup(
    State(state): State<AppState>,
    Query(params): Query<ApiKeyParams>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ServerError> {
    require_api_key(params.key.as_deref())?;

    let uid = state
        .tokens
        .verify_id_token(&req.id_token)
        .ok_or(ServerError::InvalidIdToken)?;
    let user = state.accounts.active_user(&uid)?;

    tracing::debug!(uid = %uid, "Account looked up");

    Ok(Json(LookupResponse { users: vec![user] }))
}

/// Emulator-only: change account flags so clients can observe identity changes
pub async fn update_account(
    State(state): State<AppState>,
    Path(uid): Path<String>,
    Query(params): Query<ApiKeyParams>,
    Json(update): Json<AccountUpdate>,
) -> Result<Json<UserInfo>, ServerError> {
    require_api_key(params.key.as_deref())?;

    let user = state.accounts.update(&uid, &update)?;
    if user.disabled {
        state.tokens.revoke_user(&uid);
    }
    Ok(Json(user))
}
