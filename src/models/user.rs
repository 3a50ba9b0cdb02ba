//! User model

use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub language: Option<String>,
    pub is_active: bool,
    pub is_banned: bool,
    pub wait_input: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserRequest {
    pub user_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub language: Option<String>,
}

/// Partial update; `None` fields keep their stored value.
/// `wait_input` transitions go through a dedicated repository call because
/// clearing the tag needs an explicit NULL write.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub language: Option<String>,
    pub is_active: Option<bool>,
    pub is_banned: Option<bool>,
}

impl User {
    /// Display name used in owner notifications and logs.
    pub fn display_name(&self) -> String {
        match (&self.full_name, &self.username) {
            (Some(name), _) => name.clone(),
            (None, Some(username)) => format!("@{}", username),
            (None, None) => self.user_id.to_string(),
        }
    }
}
