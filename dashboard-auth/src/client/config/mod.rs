mod settings;

pub use settings::{config_builder, AuthSettings, Settings};
