//! Chat model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::types::Json;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Chat {
    pub chat_id: i64,
    pub chat_type: String,
    pub chat_title: Option<String>,
    pub language: Option<String>,
    pub is_active: bool,
    pub is_banned: bool,
    /// Whether the bot itself currently holds admin rights in this chat.
    pub is_admin: bool,
    /// Stamp of the last full admin-roster snapshot; null means never taken.
    pub last_admins_update: Option<DateTime<Utc>>,
    pub chat_permissions: Option<Json<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateChatRequest {
    pub chat_id: i64,
    pub chat_type: String,
    pub chat_title: Option<String>,
    pub language: Option<String>,
    pub chat_permissions: Option<serde_json::Value>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateChatRequest {
    pub chat_title: Option<String>,
    pub language: Option<String>,
    pub is_active: Option<bool>,
    pub is_banned: Option<bool>,
    pub is_admin: Option<bool>,
}

impl Chat {
    pub fn is_group_like(&self) -> bool {
        self.chat_type == "group" || self.chat_type == "supergroup"
    }

    pub fn is_channel(&self) -> bool {
        self.chat_type == "channel"
    }
}

/// Storage name for a live chat's type.
pub fn kind_of(chat: &teloxide::types::Chat) -> &'static str {
    if chat.is_supergroup() {
        "supergroup"
    } else if chat.is_group() {
        "group"
    } else if chat.is_channel() {
        "channel"
    } else {
        "private"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chat(chat_type: &str) -> Chat {
        Chat {
            chat_id: -100,
            chat_type: chat_type.to_string(),
            chat_title: None,
            language: None,
            is_active: true,
            is_banned: false,
            is_admin: false,
            last_admins_update: None,
            chat_permissions: None,
        }
    }

    #[test]
    fn test_group_like_classification() {
        assert!(chat("group").is_group_like());
        assert!(chat("supergroup").is_group_like());
        assert!(!chat("channel").is_group_like());
        assert!(chat("channel").is_channel());
        assert!(!chat("private").is_group_like());
    }
}
