//! chatwarden Telegram bot
//!
//! A chat administration bot built around an admin-permission snapshot: it
//! gates group commands on live admin capabilities, manages user and chat
//! bans, enforces a join policy and answers in the stored language.

pub mod config;
pub mod database;
pub mod handlers;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{ChatWardenError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use i18n::I18n;
pub use services::ServiceFactory;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
