//! Error handling for chatwarden
//!
//! This module defines the main error types used throughout the application
//! and provides a unified error handling strategy.

use thiserror::Error;

/// Main error type for the chatwarden application
#[derive(Error, Debug)]
pub enum ChatWardenError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Telegram API error: {0}")]
    Telegram(#[from] teloxide::RequestError),

    #[error("Directory lookup error: {0}")]
    Directory(#[from] DirectoryError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("User not found: {user_id}")]
    UserNotFound { user_id: i64 },

    #[error("Chat not found: {chat_id}")]
    ChatNotFound { chat_id: i64 },

    #[error("Unknown settings field: {0}")]
    UnknownSetting(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the remote chat directory (chat info, admin lists, leave).
///
/// Every variant is treated as the unreachable-chat class by the permission
/// evaluator; the split exists for log context.
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("chat is not visible to the bot")]
    NotFound,

    #[error("directory call timed out")]
    Timeout,

    #[error("directory unavailable: {0}")]
    Unavailable(String),
}

/// Result type alias for chatwarden operations
pub type Result<T> = std::result::Result<T, ChatWardenError>;

impl From<teloxide::RequestError> for DirectoryError {
    fn from(err: teloxide::RequestError) -> Self {
        match err {
            teloxide::RequestError::Api(api) => {
                tracing::debug!(error = %api, "directory call rejected by the platform");
                DirectoryError::NotFound
            }
            other => DirectoryError::Unavailable(other.to_string()),
        }
    }
}
