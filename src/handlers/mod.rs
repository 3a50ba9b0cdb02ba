//! Bot handlers module
//!
//! This module contains all Telegram bot handlers organized by type:
//! - Command handlers for bot commands
//! - Callback handlers for inline keyboard interactions
//! - Message handlers for wait-input flows and service messages
//! - Membership handlers for chat member updates

pub mod commands;
pub mod callbacks;
pub mod membership;
pub mod messages;

// Re-export commonly used handler functions
pub use commands::*;
pub use callbacks::*;
pub use membership::*;
pub use messages::*;
