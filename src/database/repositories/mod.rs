//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod user;
pub mod chat;
pub mod admin;
pub mod settings;

// Re-export repositories
pub use user::UserRepository;
pub use chat::ChatRepository;
pub use admin::AdminRepository;
pub use settings::SettingsRepository;
