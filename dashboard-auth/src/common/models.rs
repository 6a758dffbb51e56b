use identity_api::endpoints::accounts::UserInfo;
use serde::{Deserialize, Serialize};

/// Key the session snapshot is stored under
pub const SNAPSHOT_KEY: &str = "user";

/// The currently authenticated principal, as reported by the identity provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

impl From<UserInfo> for Identity {
    fn from(user: UserInfo) -> Self {
        Self {
            id: user.local_id,
            email: user.email,
            email_verified: user.email_verified,
        }
    }
}

/// Serializable projection of an [`Identity`] kept in local storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub id: String,
    pub email: Option<String>,
    pub email_verified: bool,
}

impl From<&Identity> for SessionSnapshot {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id.clone(),
            email: identity.email.clone(),
            email_verified: identity.email_verified,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_uses_camel_case_fields() {
        let identity = Identity {
            id: "uid-1".to_string(),
            email: Some("ada@example.com".to_string()),
            email_verified: true,
        };
        let json = serde_json::to_value(SessionSnapshot::from(&identity)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": "uid-1",
                "email": "ada@example.com",
                "emailVerified": true,
            })
        );
    }

    #[test]
    fn snapshot_keeps_missing_email_as_null() {
        let identity = Identity {
            id: "uid-2".to_string(),
            email: None,
            email_verified: false,
        };
        let json = serde_json::to_string(&SessionSnapshot::from(&identity)).unwrap();
        assert_eq!(json, r#"{"id":"uid-2","email":null,"emailVerified":false}"#);
    }
}
