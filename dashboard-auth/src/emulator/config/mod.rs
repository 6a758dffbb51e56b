use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Configuration {
    #[serde(default)]
    pub server: ServerConfiguration,

    /// Accounts the emulator accepts
    #[serde(default)]
    pub accounts: Vec<SeedAccount>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfiguration {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_token_ttl")]
    pub token_ttl_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub email_verified: bool,
    #[serde(default)]
    pub disabled: bool,
    /// Generated when not given
    #[serde(default)]
    pub uid: Option<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9099
}

fn default_token_ttl() -> u64 {
    3600
}

impl Default for ServerConfiguration {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            token_ttl_seconds: default_token_ttl(),
        }
    }
}

impl Configuration {
    pub fn new() -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        if std::path::Path::new("emulator.toml").exists() {
            builder = builder.add_source(config::File::with_name("emulator"));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DASHBOARD_EMULATOR")
                .separator("__")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
