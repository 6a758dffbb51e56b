use dashboard_auth::{config_builder, AuthError, AuthSettings};
use serde::Deserialize;
use std::time::Duration;

use crate::location::PositionOptions;

/// Everything the dashboard reads from `config.toml` / `DASHBOARD__*`
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppSettings {
    #[serde(default)]
    pub auth: AuthSettings,

    #[serde(default)]
    pub location: LocationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LocationSettings {
    /// IP geolocation endpoint. Empty disables geolocation.
    #[serde(default = "default_lookup_url")]
    pub lookup_url: String,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default = "default_high_accuracy")]
    pub enable_high_accuracy: bool,

    #[serde(default)]
    pub maximum_age_ms: u64,
}

fn default_lookup_url() -> String {
    "https://ipapi.co/json".to_string()
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_high_accuracy() -> bool {
    true
}

impl Default for LocationSettings {
    fn default() -> Self {
        Self {
            lookup_url: default_lookup_url(),
            timeout_ms: default_timeout_ms(),
            enable_high_accuracy: default_high_accuracy(),
            maximum_age_ms: 0,
        }
    }
}

impl LocationSettings {
    pub fn is_enabled(&self) -> bool {
        !self.lookup_url.trim().is_empty()
    }

    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: Duration::from_millis(self.timeout_ms),
            enable_high_accuracy: self.enable_high_accuracy,
            maximum_age: Duration::from_millis(self.maximum_age_ms),
        }
    }
}

impl AppSettings {
    /// Load and validate settings
    pub fn new() -> Result<Self, AuthError> {
        let settings: Self = config_builder().build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), AuthError> {
        self.auth.validate().map_err(AuthError::Configuration)?;
        if self.location.is_enabled() && !self.location.lookup_url.starts_with("http") {
            return Err(AuthError::Configuration(
                "location.lookup_url must be a valid HTTP(S) URL".to_string(),
            ));
        }
        if self.location.timeout_ms == 0 {
            return Err(AuthError::Configuration(
                "location.timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn from_toml(toml: &str) -> AppSettings {
        config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn location_defaults_match_position_defaults() {
        let settings = from_toml("[auth]\napi_key = \"k\"\n");
        assert!(settings.location.is_enabled());
        assert_eq!(
            settings.location.position_options(),
            PositionOptions::default()
        );
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn empty_lookup_url_disables_geolocation() {
        let settings = from_toml("[auth]\napi_key = \"k\"\n[location]\nlookup_url = \"\"\n");
        assert!(!settings.location.is_enabled());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn invalid_location_settings_are_rejected() {
        let settings = from_toml(
            "[auth]\napi_key = \"k\"\n[location]\nlookup_url = \"ipapi.co\"\n",
        );
        assert!(matches!(
            settings.validate(),
            Err(AuthError::Configuration(msg)) if msg.contains("lookup_url")
        ));

        let settings = from_toml("[auth]\napi_key = \"k\"\n[location]\ntimeout_ms = 0\n");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn missing_api_key_is_a_configuration_error() {
        assert!(matches!(
            from_toml("").validate(),
            Err(AuthError::Configuration(_))
        ));
    }
}
