//! Chat repository implementation

use sqlx::SqlitePool;
use sqlx::types::Json;
use crate::models::chat::{Chat, CreateChatRequest, UpdateChatRequest};
use crate::utils::errors::ChatWardenError;

const CHAT_COLUMNS: &str =
    "chat_id, chat_type, chat_title, language, is_active, is_banned, is_admin, last_admins_update, chat_permissions";

fn missing_row(chat_id: i64, error: sqlx::Error) -> ChatWardenError {
    match error {
        sqlx::Error::RowNotFound => ChatWardenError::ChatNotFound { chat_id },
        other => other.into(),
    }
}

#[derive(Clone)]
#[derive(Debug)]
pub struct ChatRepository {
    pool: SqlitePool,
}

impl ChatRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new chat
    pub async fn create(&self, request: CreateChatRequest) -> Result<Chat, ChatWardenError> {
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            INSERT INTO chats (chat_id, chat_type, chat_title, language, chat_permissions)
            VALUES (?, ?, ?, ?, ?)
            RETURNING chat_id, chat_type, chat_title, language, is_active, is_banned, is_admin, last_admins_update, chat_permissions
            "#
        )
        .bind(request.chat_id)
        .bind(request.chat_type)
        .bind(request.chat_title)
        .bind(request.language)
        .bind(request.chat_permissions.map(Json))
        .fetch_one(&self.pool)
        .await?;

        Ok(chat)
    }

    /// Find chat by ID
    pub async fn find_by_id(&self, chat_id: i64) -> Result<Option<Chat>, ChatWardenError> {
        let chat = sqlx::query_as::<_, Chat>(
            &format!("SELECT {CHAT_COLUMNS} FROM chats WHERE chat_id = ?")
        )
        .bind(chat_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(chat)
    }

    /// Update chat
    pub async fn update(&self, chat_id: i64, request: UpdateChatRequest) -> Result<Chat, ChatWardenError> {
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            UPDATE chats
            SET chat_title = COALESCE(?, chat_title),
                language = COALESCE(?, language),
                is_active = COALESCE(?, is_active),
                is_banned = COALESCE(?, is_banned),
                is_admin = COALESCE(?, is_admin)
            WHERE chat_id = ?
            RETURNING chat_id, chat_type, chat_title, language, is_active, is_banned, is_admin, last_admins_update, chat_permissions
            "#
        )
        .bind(request.chat_title)
        .bind(request.language)
        .bind(request.is_active)
        .bind(request.is_banned)
        .bind(request.is_admin)
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_row(chat_id, e))?;

        Ok(chat)
    }

    /// Create or refresh the chat row from a membership update. Language,
    /// ban flag, permissions and the admin snapshot stamp are left untouched
    /// on existing rows.
    pub async fn upsert_membership(
        &self,
        chat_id: i64,
        chat_type: &str,
        chat_title: Option<&str>,
        is_active: bool,
        is_admin: bool,
    ) -> Result<Chat, ChatWardenError> {
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            INSERT INTO chats (chat_id, chat_type, chat_title, is_active, is_admin)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT (chat_id) DO UPDATE SET
                chat_type = excluded.chat_type,
                chat_title = excluded.chat_title,
                is_active = excluded.is_active,
                is_admin = excluded.is_admin
            RETURNING chat_id, chat_type, chat_title, language, is_active, is_banned, is_admin, last_admins_update, chat_permissions
            "#
        )
        .bind(chat_id)
        .bind(chat_type)
        .bind(chat_title)
        .bind(is_active)
        .bind(is_admin)
        .fetch_one(&self.pool)
        .await?;

        Ok(chat)
    }

    /// Ban/unban chat
    pub async fn set_ban_status(&self, chat_id: i64, is_banned: bool) -> Result<Chat, ChatWardenError> {
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            UPDATE chats
            SET is_banned = ?
            WHERE chat_id = ?
            RETURNING chat_id, chat_type, chat_title, language, is_active, is_banned, is_admin, last_admins_update, chat_permissions
            "#
        )
        .bind(is_banned)
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_row(chat_id, e))?;

        Ok(chat)
    }

    /// Rename chat after a title-change service message
    pub async fn set_title(&self, chat_id: i64, title: &str) -> Result<Chat, ChatWardenError> {
        let chat = sqlx::query_as::<_, Chat>(
            r#"
            UPDATE chats
            SET chat_title = ?
            WHERE chat_id = ?
            RETURNING chat_id, chat_type, chat_title, language, is_active, is_banned, is_admin, last_admins_update, chat_permissions
            "#
        )
        .bind(title)
        .bind(chat_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_row(chat_id, e))?;

        Ok(chat)
    }

    /// All chats, for the export path
    pub async fn get_all(&self) -> Result<Vec<Chat>, ChatWardenError> {
        let chats = sqlx::query_as::<_, Chat>(
            &format!("SELECT {CHAT_COLUMNS} FROM chats ORDER BY chat_id ASC")
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(chats)
    }

    /// Count total chats
    pub async fn count(&self) -> Result<i64, ChatWardenError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chats")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count chats the bot is still a member of
    pub async fn count_active(&self) -> Result<i64, ChatWardenError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM chats WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Delete chat (admin snapshot rows go with it)
    pub async fn delete(&self, chat_id: i64) -> Result<bool, ChatWardenError> {
        let result = sqlx::query("DELETE FROM chats WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
