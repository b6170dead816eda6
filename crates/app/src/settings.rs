//! Application settings, read from an optional `settings.toml` plus
//! `FUNDBOT_*` environment variables (e.g. `FUNDBOT_TELEGRAM__TOKEN`).

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    #[serde(default = "default_level")]
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct Telegram {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct Ledger {
    pub spreadsheet_id: String,
    /// Path to the service-account JSON key.
    #[serde(default = "default_credentials")]
    pub credentials: String,
}

#[derive(Debug, Deserialize)]
pub struct Providers {
    pub alpha_vantage_api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub app: App,
    pub telegram: Telegram,
    pub ledger: Ledger,
    pub providers: Providers,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("settings").required(false))
            .add_source(Environment::with_prefix("FUNDBOT").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

fn default_level() -> String {
    "info".to_string()
}

fn default_credentials() -> String {
    "serviceAccount.json".to_string()
}
