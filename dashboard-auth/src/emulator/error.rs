use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use identity_api::{ErrorDetail, ErrorItem, ErrorResponse};
use thiserror::Error;

/// Errors answered in the provider's `{"error": {...}}` shape
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid login credentials")]
    InvalidCredentials,

    #[error("User disabled")]
    UserDisabled,

    #[error("User not found")]
    UserNotFound,

    #[error("Invalid id token")]
    InvalidIdToken,

    #[error("Invalid refresh token")]
    InvalidRefreshToken,

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ServerError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ServerError::BadRequest(code) => (StatusCode::BAD_REQUEST, code.clone()),
            ServerError::InvalidCredentials => (
                StatusCode::BAD_REQUEST,
                "INVALID_LOGIN_CREDENTIALS".to_string(),
            ),
            ServerError::UserDisabled => (StatusCode::BAD_REQUEST, "USER_DISABLED".to_string()),
            ServerError::UserNotFound => (StatusCode::BAD_REQUEST, "USER_NOT_FOUND".to_string()),
            ServerError::InvalidIdToken => {
                (StatusCode::BAD_REQUEST, "INVALID_ID_TOKEN".to_string())
            }
            ServerError::InvalidRefreshToken => {
                (StatusCode::BAD_REQUEST, "INVALID_REFRESH_TOKEN".to_string())
            }
            ServerError::Configuration(msg) | ServerError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, msg.clone())
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                code: status.as_u16(),
                errors: vec![ErrorItem {
                    message: message.clone(),
                    domain: Some("global".to_string()),
                    reason: Some("invalid".to_string()),
                }],
                message,
            },
        });

        (status, body).into_response()
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(err: config::ConfigError) -> Self {
        ServerError::Configuration(format!("Configuration error: {}", err))
    }
}
