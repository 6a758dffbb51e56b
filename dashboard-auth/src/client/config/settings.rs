use config::{builder::DefaultState, Config, ConfigBuilder, ConfigError, Environment, File};
use serde::Deserialize;

/// Sources shared by every settings type: an optional TOML file
/// (`DASHBOARD_CONFIG`, default `config.toml`) overlaid with
/// `DASHBOARD__<SECTION>__<KEY>` environment variables.
pub fn config_builder() -> ConfigBuilder<DefaultState> {
    let config_path =
        std::env::var("DASHBOARD_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

    Config::builder()
        .add_source(File::with_name(&config_path).required(false))
        .add_source(
            Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        )
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub auth: AuthSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    #[serde(default)]
    pub api_key: String,

    #[serde(default = "default_identity_url")]
    pub identity_url: String,

    #[serde(default = "default_token_url")]
    pub token_url: String,

    #[serde(default = "default_clear_snapshot")]
    pub clear_snapshot_on_sign_out: bool,
}

fn default_identity_url() -> String {
    identity_api::IDENTITY_TOOLKIT_URL.to_string()
}

fn default_token_url() -> String {
    identity_api::SECURE_TOKEN_URL.to_string()
}

fn default_clear_snapshot() -> bool {
    true
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            identity_url: default_identity_url(),
            token_url: default_token_url(),
            clear_snapshot_on_sign_out: default_clear_snapshot(),
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        config_builder().build()?.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        self.auth.validate()
    }
}

impl AuthSettings {
    pub fn validate(&self) -> Result<(), String> {
        if self.api_key.trim().is_empty() {
            return Err("auth.api_key is required".to_string());
        }
        if !self.identity_url.starts_with("http") {
            return Err("auth.identity_url must be a valid HTTP(S) URL".to_string());
        }
        if !self.token_url.starts_with("http") {
            return Err("auth.token_url must be a valid HTTP(S) URL".to_string());
        }
        Ok(())
    }
}
