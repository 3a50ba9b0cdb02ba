//! Shared helpers for the integration suites: in-memory database setup,
//! a scripted chat directory, a mock Telegram API server and builders for
//! incoming update payloads.

#![allow(dead_code)]

pub mod database_helper;
pub mod scripted_directory;
pub mod telegram_mock;
pub mod test_data;

pub use database_helper::*;
pub use scripted_directory::*;
pub use telegram_mock::*;
pub use test_data::*;

use std::sync::Arc;
use chatwarden::config::Settings;
use chatwarden::i18n::I18n;

/// Owner identity the suites configure and act as.
pub const OWNER_ID: i64 = 5_000_001;

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.bot.token = TEST_BOT_TOKEN.to_string();
    settings.bot.owner_id = OWNER_ID;
    settings
}

/// The real locale catalogs, loaded from the repository's locales directory.
pub async fn test_i18n() -> Arc<I18n> {
    let mut i18n = I18n::new(&test_settings().i18n);
    i18n.load_translations().await.expect("locale catalogs should load");
    Arc::new(i18n)
}
