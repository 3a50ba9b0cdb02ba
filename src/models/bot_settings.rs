//! Bot settings model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Identity of the single settings row.
pub const SETTINGS_ROW_ID: i64 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BotSettings {
    pub id: i64,
    pub can_join_group: bool,
    pub can_join_channel: bool,
    pub owner_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; `None` fields keep their stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBotSettingsRequest {
    pub can_join_group: Option<bool>,
    pub can_join_channel: Option<bool>,
    pub owner_id: Option<i64>,
}

impl BotSettings {
    /// Whether the join policy lets the bot stay in a chat of this type.
    pub fn may_join(&self, chat_type: &str) -> bool {
        match chat_type {
            "group" | "supergroup" => self.can_join_group,
            "channel" => self.can_join_channel,
            _ => true,
        }
    }
}
