//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub bot: BotConfig,
    pub database: DatabaseConfig,
    pub directory: DirectoryConfig,
    pub joins: JoinPolicyConfig,
    pub i18n: I18nConfig,
    pub logging: LoggingConfig,
}

/// Telegram bot configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BotConfig {
    pub token: String,
    pub owner_id: i64,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Remote directory lookup configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DirectoryConfig {
    pub timeout_seconds: u64,
}

/// Join policy defaults, applied when the settings row is first created.
/// After that the stored row governs and is edited through the owner panel.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JoinPolicyConfig {
    pub allow_groups: bool,
    pub allow_channels: bool,
}

/// Internationalization configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct I18nConfig {
    pub default_language: String,
    pub supported_languages: Vec<String>,
    pub locales_path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file_path: Option<String>,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("config").required(false))
            .add_source(config::Environment::with_prefix("CHATWARDEN").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::ChatWardenError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bot: BotConfig {
                token: String::new(),
                owner_id: 0,
            },
            database: DatabaseConfig {
                url: "sqlite://chatwarden.sqlite".to_string(),
                max_connections: 10,
                min_connections: 1,
            },
            directory: DirectoryConfig {
                timeout_seconds: 10,
            },
            joins: JoinPolicyConfig {
                allow_groups: true,
                allow_channels: true,
            },
            i18n: I18nConfig {
                default_language: "en".to_string(),
                supported_languages: vec!["en".to_string(), "he".to_string()],
                locales_path: "locales".to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: None,
            },
        }
    }
}
