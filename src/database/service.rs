//! Database service layer
//!
//! This module provides a high-level interface to database operations

use crate::database::{DatabasePool, UserRepository, ChatRepository, AdminRepository, SettingsRepository};
use crate::models::chat::{Chat, CreateChatRequest};
use crate::models::user::{User, CreateUserRequest};
use crate::utils::errors::ChatWardenError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pub users: UserRepository,
    pub chats: ChatRepository,
    pub admins: AdminRepository,
    pub settings: SettingsRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            chats: ChatRepository::new(pool.clone()),
            admins: AdminRepository::new(pool.clone()),
            settings: SettingsRepository::new(pool),
        }
    }

    /// Fetch the user row, creating it on first contact. A freshly created
    /// user has no language yet, which is what triggers the language prompt.
    pub async fn initialize_user(
        &self,
        user_id: i64,
        username: Option<String>,
        full_name: Option<String>,
    ) -> Result<User, ChatWardenError> {
        if let Some(existing_user) = self.users.find_by_id(user_id).await? {
            return Ok(existing_user);
        }

        let request = CreateUserRequest {
            user_id,
            username,
            full_name,
            language: None,
        };

        self.users.create(request).await
    }

    /// Fetch the chat row, creating it if this is the first sighting
    pub async fn initialize_chat(&self, request: CreateChatRequest) -> Result<Chat, ChatWardenError> {
        if let Some(existing_chat) = self.chats.find_by_id(request.chat_id).await? {
            return Ok(existing_chat);
        }

        self.chats.create(request).await
    }
}
