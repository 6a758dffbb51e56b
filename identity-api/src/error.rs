use serde::{Deserialize, Serialize};
use tower_api_client::{Error as ApiError, StatusCode};

#[derive(Debug)]
pub enum IdentityApiError {
    /// The provider answered with an error body
    Provider(StatusCode, ErrorDetail),
    /// Transport or decoding failure before a provider answer was available
    Internal(ApiError),
}

impl From<ApiError> for IdentityApiError {
    fn from(value: ApiError) -> Self {
        match value {
            ApiError::ClientError(status, detail) | ApiError::ServerError(status, detail) => {
                let detail = detail.to_string();
                match serde_json::from_str::<ErrorResponse>(&detail) {
                    Ok(response) => IdentityApiError::Provider(status, response.error),
                    // Proxies and load balancers answer with non-JSON bodies
                    Err(_) => IdentityApiError::Provider(
                        status,
                        ErrorDetail {
                            code: status.as_u16(),
                            message: detail,
                            errors: Vec::new(),
                        },
                    ),
                }
            }
            e => IdentityApiError::Internal(e),
        }
    }
}

impl std::fmt::Display for IdentityApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityApiError::Internal(e) => write!(f, "Internal error: {}", e),
            IdentityApiError::Provider(status, detail) => {
                write!(f, "({}) {}", status, detail.message)
            }
        }
    }
}

impl std::error::Error for IdentityApiError {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: u16,
    pub message: String,
    #[serde(default)]
    pub errors: Vec<ErrorItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorItem {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl ErrorDetail {
    /// Machine readable code, e.g. `INVALID_PASSWORD`.
    ///
    /// Some codes carry a human readable suffix separated by `" : "`
    /// (`TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account ...`).
    pub fn reason_code(&self) -> &str {
        match self.message.split_once(" : ") {
            Some((code, _)) => code.trim(),
            None => self.message.trim(),
        }
    }

    /// Human readable suffix of the message, if the provider sent one
    pub fn detail(&self) -> Option<&str> {
        self.message
            .split_once(" : ")
            .map(|(_, detail)| detail.trim())
            .filter(|detail| !detail.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail(message: &str) -> ErrorDetail {
        ErrorDetail {
            code: 400,
            message: message.to_string(),
            errors: Vec::new(),
        }
    }

    #[test]
    fn parses_provider_error_body() {
        let body = r#"{
            "error": {
                "code": 400,
                "message": "INVALID_PASSWORD",
                "errors": [{"message": "INVALID_PASSWORD", "domain": "global", "reason": "invalid"}]
            }
        }"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.error.code, 400);
        assert_eq!(response.error.reason_code(), "INVALID_PASSWORD");
        assert_eq!(response.error.detail(), None);
        assert_eq!(response.error.errors[0].reason.as_deref(), Some("invalid"));
    }

    #[test]
    fn error_items_are_optional() {
        let body = r#"{"error": {"code": 400, "message": "USER_DISABLED"}}"#;
        let response: ErrorResponse = serde_json::from_str(body).unwrap();
        assert!(response.error.errors.is_empty());
    }

    #[test]
    fn splits_code_and_detail() {
        let d = detail("TOO_MANY_ATTEMPTS_TRY_LATER : Access to this account has been temporarily disabled");
        assert_eq!(d.reason_code(), "TOO_MANY_ATTEMPTS_TRY_LATER");
        assert_eq!(
            d.detail(),
            Some("Access to this account has been temporarily disabled")
        );
    }

    #[test]
    fn empty_detail_is_none() {
        assert_eq!(detail("WEAK_PASSWORD : ").detail(), None);
    }
}
