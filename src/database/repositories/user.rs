//! User repository implementation

use sqlx::SqlitePool;
use chrono::Utc;
use crate::models::user::{User, CreateUserRequest, UpdateUserRequest};
use crate::utils::errors::ChatWardenError;

const USER_COLUMNS: &str =
    "user_id, username, full_name, language, is_active, is_banned, wait_input, created_at, updated_at";

fn missing_row(user_id: i64, error: sqlx::Error) -> ChatWardenError {
    match error {
        sqlx::Error::RowNotFound => ChatWardenError::UserNotFound { user_id },
        other => other.into(),
    }
}

#[derive(Clone)]
#[derive(Debug)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a new user
    pub async fn create(&self, request: CreateUserRequest) -> Result<User, ChatWardenError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_id, username, full_name, language, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            RETURNING user_id, username, full_name, language, is_active, is_banned, wait_input, created_at, updated_at
            "#
        )
        .bind(request.user_id)
        .bind(request.username)
        .bind(request.full_name)
        .bind(request.language)
        .bind(Utc::now())
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by ID
    pub async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, ChatWardenError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE user_id = ?")
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Find user by username (stored without the leading @)
    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, ChatWardenError> {
        let user = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?")
        )
        .bind(username.trim_start_matches('@'))
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    /// Update user
    pub async fn update(&self, user_id: i64, request: UpdateUserRequest) -> Result<User, ChatWardenError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET username = COALESCE(?, username),
                full_name = COALESCE(?, full_name),
                language = COALESCE(?, language),
                is_active = COALESCE(?, is_active),
                is_banned = COALESCE(?, is_banned),
                updated_at = ?
            WHERE user_id = ?
            RETURNING user_id, username, full_name, language, is_active, is_banned, wait_input, created_at, updated_at
            "#
        )
        .bind(request.username)
        .bind(request.full_name)
        .bind(request.language)
        .bind(request.is_active)
        .bind(request.is_banned)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_row(user_id, e))?;

        Ok(user)
    }

    /// Ban/unban user
    pub async fn set_ban_status(&self, user_id: i64, is_banned: bool) -> Result<User, ChatWardenError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET is_banned = ?, updated_at = ?
            WHERE user_id = ?
            RETURNING user_id, username, full_name, language, is_active, is_banned, wait_input, created_at, updated_at
            "#
        )
        .bind(is_banned)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_row(user_id, e))?;

        Ok(user)
    }

    /// Set or clear the wait-input conversation tag
    pub async fn set_wait_input(&self, user_id: i64, tag: Option<&str>) -> Result<User, ChatWardenError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET wait_input = ?, updated_at = ?
            WHERE user_id = ?
            RETURNING user_id, username, full_name, language, is_active, is_banned, wait_input, created_at, updated_at
            "#
        )
        .bind(tag)
        .bind(Utc::now())
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| missing_row(user_id, e))?;

        Ok(user)
    }

    /// All users, oldest first (export path)
    pub async fn get_all(&self) -> Result<Vec<User>, ChatWardenError> {
        let users = sqlx::query_as::<_, User>(
            &format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at ASC")
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    /// Count total users
    pub async fn count(&self) -> Result<i64, ChatWardenError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }

    /// Count active users
    pub async fn count_active(&self) -> Result<i64, ChatWardenError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users WHERE is_active = 1")
            .fetch_one(&self.pool)
            .await?;

        Ok(count.0)
    }
}
