use super::{ApiKey, ExpiresIn};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Requests

/// Exchange a refresh token for a fresh id token
#[derive(Debug, Clone, Serialize)]
pub struct RefreshIdToken {
    #[serde(skip)]
    api_key: ApiKey,
    grant_type: &'static str,
    refresh_token: String,
}

impl RefreshIdToken {
    pub fn new(api_key: ApiKey, refresh_token: impl Into<String>) -> Self {
        Self {
            api_key,
            grant_type: "refresh_token",
            refresh_token: refresh_token.into(),
        }
    }
}

impl Request for RefreshIdToken {
    type Data = Self;
    type Response = RefreshIdTokenResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/token?key={}", self.api_key).into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshIdTokenResponse {
    pub expires_in: ExpiresIn,
    #[serde(default)]
    pub token_type: String,
    pub refresh_token: String,
    pub id_token: String,
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}
