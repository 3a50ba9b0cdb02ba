//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod user;
pub mod chat;
pub mod admin;
pub mod bot_settings;

// Re-export commonly used models
pub use user::{User, CreateUserRequest, UpdateUserRequest};
pub use chat::{Chat, CreateChatRequest, UpdateChatRequest};
pub use admin::{AdminPermission, ChatAdmin, PrivilegeMap, privileges_of, is_admin_kind};
pub use bot_settings::{BotSettings, UpdateBotSettingsRequest, SETTINGS_ROW_ID};
