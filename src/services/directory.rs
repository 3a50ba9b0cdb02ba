//! Chat directory access
//!
//! The only network-facing capabilities the permission layer depends on:
//! fetching chat metadata, fetching the live administrator roster, and
//! leaving a chat. Every call is individually time-bounded.

use std::time::Duration;
use async_trait::async_trait;
use serde_json::Value;
use teloxide::types::ChatId;
use teloxide::{Bot, requests::Requester, prelude::Request};
use tokio::time::timeout;
use tracing::debug;
use crate::models::admin::{privileges_of, ChatAdmin};
use crate::utils::errors::DirectoryError;

/// Chat metadata as the directory sees it
#[derive(Debug, Clone)]
pub struct ChatInfo {
    /// "private", "group", "supergroup" or "channel"
    pub chat_type: String,
    pub title: Option<String>,
    /// Default member permissions, for group-like chats
    pub permissions: Option<Value>,
}

/// Remote lookups the access-control core needs
#[async_trait]
pub trait ChatDirectory: Send + Sync {
    async fn fetch_chat_info(&self, chat_id: i64) -> Result<ChatInfo, DirectoryError>;
    async fn fetch_admin_list(&self, chat_id: i64) -> Result<Vec<ChatAdmin>, DirectoryError>;
    async fn leave_chat(&self, chat_id: i64) -> Result<(), DirectoryError>;
}

/// Directory backed by the Telegram Bot API
#[derive(Clone)]
pub struct TelegramDirectory {
    bot: Bot,
    call_timeout: Duration,
}

impl TelegramDirectory {
    pub fn new(bot: Bot, call_timeout: Duration) -> Self {
        Self { bot, call_timeout }
    }
}

#[async_trait]
impl ChatDirectory for TelegramDirectory {
    async fn fetch_chat_info(&self, chat_id: i64) -> Result<ChatInfo, DirectoryError> {
        debug!(chat_id = chat_id, "Fetching chat info");

        let chat = timeout(self.call_timeout, self.bot.get_chat(ChatId(chat_id)).send())
            .await
            .map_err(|_| DirectoryError::Timeout)??;

        // Read the wire shape instead of matching the nested chat kinds,
        // which keeps this in one place when the API grows new chat fields.
        let value = serde_json::to_value(&chat)
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        Ok(ChatInfo {
            chat_type: value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or("private")
                .to_string(),
            title: value.get("title").and_then(Value::as_str).map(str::to_string),
            permissions: value.get("permissions").cloned().filter(|v| !v.is_null()),
        })
    }

    async fn fetch_admin_list(&self, chat_id: i64) -> Result<Vec<ChatAdmin>, DirectoryError> {
        debug!(chat_id = chat_id, "Fetching administrator roster");

        let members = timeout(
            self.call_timeout,
            self.bot.get_chat_administrators(ChatId(chat_id)).send(),
        )
        .await
        .map_err(|_| DirectoryError::Timeout)??;

        Ok(members
            .iter()
            .map(|member| ChatAdmin {
                admin_id: member.user.id.0 as i64,
                privileges: privileges_of(&member.kind),
            })
            .collect())
    }

    async fn leave_chat(&self, chat_id: i64) -> Result<(), DirectoryError> {
        debug!(chat_id = chat_id, "Leaving chat");

        timeout(self.call_timeout, self.bot.leave_chat(ChatId(chat_id)).send())
            .await
            .map_err(|_| DirectoryError::Timeout)??;

        Ok(())
    }
}
