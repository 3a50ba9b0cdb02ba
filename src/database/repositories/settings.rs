//! Bot settings repository implementation

use sqlx::SqlitePool;
use chrono::Utc;
use crate::models::bot_settings::{BotSettings, UpdateBotSettingsRequest, SETTINGS_ROW_ID};
use crate::utils::errors::ChatWardenError;

const SETTINGS_COLUMNS: &str =
    "id, can_join_group, can_join_channel, owner_id, created_at, updated_at";

#[derive(Clone)]
#[derive(Debug)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the singleton row, creating it with the given join defaults if
    /// it does not exist yet. Defaults only apply at creation time; a stored
    /// row always wins over configuration.
    pub async fn load_or_create(
        &self,
        default_can_join_group: bool,
        default_can_join_channel: bool,
    ) -> Result<BotSettings, ChatWardenError> {
        sqlx::query(
            r#"
            INSERT INTO bot_settings (id, can_join_group, can_join_channel, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (id) DO NOTHING
            "#
        )
        .bind(SETTINGS_ROW_ID)
        .bind(default_can_join_group)
        .bind(default_can_join_channel)
        .bind(Utc::now())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let settings = sqlx::query_as::<_, BotSettings>(
            &format!("SELECT {SETTINGS_COLUMNS} FROM bot_settings WHERE id = ?")
        )
        .bind(SETTINGS_ROW_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Update the singleton row
    pub async fn update(&self, request: UpdateBotSettingsRequest) -> Result<BotSettings, ChatWardenError> {
        let settings = sqlx::query_as::<_, BotSettings>(
            r#"
            UPDATE bot_settings
            SET can_join_group = COALESCE(?, can_join_group),
                can_join_channel = COALESCE(?, can_join_channel),
                owner_id = COALESCE(?, owner_id),
                updated_at = ?
            WHERE id = ?
            RETURNING id, can_join_group, can_join_channel, owner_id, created_at, updated_at
            "#
        )
        .bind(request.can_join_group)
        .bind(request.can_join_channel)
        .bind(request.owner_id)
        .bind(Utc::now())
        .bind(SETTINGS_ROW_ID)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
