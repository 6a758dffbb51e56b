use identity_api::endpoints::accounts::UserInfo;
use secrecy::SecretString;

pub struct Account {
    pub uid: String,
    pub email: String,
    pub password: SecretString,
    pub email_verified: bool,
    pub disabled: bool,
}

impl Account {
    pub fn user_info(&self) -> UserInfo {
        UserInfo {
            local_id: self.uid.clone(),
            email: Some(self.email.clone()),
            email_verified: self.email_verified,
            display_name: None,
            disabled: self.disabled,
        }
    }
}
