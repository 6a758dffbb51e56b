use super::{ApiKey, ExpiresIn};
use crate::macros::setter;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize, Serializer};
use std::borrow::Cow;
use tower_api_client::{Method, Request, RequestData};

// Common

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub local_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub disabled: bool,
}

fn expose_secret<S: Serializer>(secret: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(secret.expose_secret())
}

// Requests

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInWithPassword {
    #[serde(skip)]
    api_key: ApiKey,
    email: String,
    #[serde(serialize_with = "expose_secret")]
    password: SecretString,
    return_secure_token: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    tenant_id: Option<String>,
}

impl SignInWithPassword {
    pub fn new(api_key: ApiKey, email: impl Into<String>, password: SecretString) -> Self {
        Self {
            api_key,
            email: email.into(),
            password,
            return_secure_token: true,
            tenant_id: None,
        }
    }

    setter!(return_secure_token: bool);
    setter!(opt tenant_id: String);
}

impl Request for SignInWithPassword {
    type Data = Self;
    type Response = SignInResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/accounts:signInWithPassword?key={}", self.api_key).into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Lookup {
    #[serde(skip)]
    api_key: ApiKey,
    id_token: String,
}

impl Lookup {
    pub fn new(api_key: ApiKey, id_token: impl Into<String>) -> Self {
        Self {
            api_key,
            id_token: id_token.into(),
        }
    }
}

impl Request for Lookup {
    type Data = Self;
    type Response = LookupResponse;
    const METHOD: Method = Method::POST;

    fn endpoint(&self) -> Cow<'_, str> {
        format!("/accounts:lookup?key={}", self.api_key).into()
    }

    fn data(&self) -> RequestData<&Self> {
        RequestData::Json(self)
    }
}

// Responses

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignInResponse {
    pub local_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub id_token: String,
    pub refresh_token: String,
    pub expires_in: ExpiresIn,
    #[serde(default)]
    pub registered: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub users: Vec<UserInfo>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_in_body_exposes_password_but_not_key() {
        let req = SignInWithPassword::new(
            ApiKey::from("browser-key"),
            "ada@example.com",
            SecretString::from("hunter2".to_string()),
        );
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["email"], "ada@example.com");
        assert_eq!(body["password"], "hunter2");
        assert_eq!(body["returnSecureToken"], true);
        assert!(body.get("apiKey").is_none());
        assert!(body.get("tenantId").is_none());
        assert_eq!(
            req.endpoint(),
            "/accounts:signInWithPassword?key=browser-key"
        );
    }

    #[test]
    fn sign_in_debug_redacts_password() {
        let req = SignInWithPassword::new(
            ApiKey::from("k"),
            "ada@example.com",
            SecretString::from("hunter2".to_string()),
        );
        assert!(!format!("{req:?}").contains("hunter2"));
    }

    #[test]
    fn tenant_setter() {
        let req = SignInWithPassword::new(
            ApiKey::from("k"),
            "ada@example.com",
            SecretString::from("pw".to_string()),
        )
        .tenant_id("tenant-a");
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["tenantId"], "tenant-a");
    }

    #[test]
    fn decodes_sign_in_response() {
        let body = r#"{
            "kind": "identitytoolkit#VerifyPasswordResponse",
            "localId": "uid-1",
            "email": "ada@example.com",
            "displayName": "",
            "idToken": "id-token",
            "registered": true,
            "refreshToken": "refresh-token",
            "expiresIn": "3600"
        }"#;
        let resp: SignInResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.local_id, "uid-1");
        assert_eq!(resp.email.as_deref(), Some("ada@example.com"));
        assert_eq!(resp.expires_in.as_secs(), 3600);
        assert!(resp.registered);
    }

    #[test]
    fn decodes_lookup_response_with_defaults() {
        let body = r#"{"users": [{"localId": "uid-1", "email": "ada@example.com"}]}"#;
        let resp: LookupResponse = serde_json::from_str(body).unwrap();
        assert_eq!(resp.users.len(), 1);
        assert!(!resp.users[0].email_verified);
        assert!(!resp.users[0].disabled);

        let empty: LookupResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.users.is_empty());
    }
}
