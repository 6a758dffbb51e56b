use serde::{Deserialize, Serialize};

// Every endpoint: ?key=<api key>
#[derive(Debug, Deserialize)]
pub struct ApiKeyParams {
    pub key: Option<String>,
}

// POST /identitytoolkit.googleapis.com/v1/accounts:signInWithPassword
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

// POST /identitytoolkit.googleapis.com/v1/accounts:lookup
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    #[serde(default)]
    pub id_token: String,
}

// POST /securetoken.googleapis.com/v1/token
#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    #[serde(default)]
    pub grant_type: String,
    #[serde(default)]
    pub refresh_token: String,
}

// PATCH /emulator/v1/accounts/{uid}
#[derive(Debug, Deserialize)]
pub struct AccountUpdate {
    pub email_verified: Option<bool>,
    pub disabled: Option<bool>,
}

// Health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub accounts: usize,
    pub active_tokens: usize,
}
