//! Services module
//!
//! This module contains business logic services

pub mod directory;
pub mod permissions;
pub mod settings;

// Re-export commonly used services
pub use directory::{ChatDirectory, ChatInfo, TelegramDirectory};
pub use permissions::{AccessDecision, PermissionService, MAX_SNAPSHOT_AGE_HOURS};
pub use settings::{SettingsService, SETTINGS_CACHE_TTL};

use std::sync::Arc;
use std::time::Duration;
use teloxide::Bot;
use crate::config::Settings;
use crate::database::DatabaseService;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub db: DatabaseService,
    pub directory: Arc<dyn ChatDirectory>,
    pub permissions: PermissionService,
    pub settings: SettingsService,
}

impl ServiceFactory {
    /// Create a new ServiceFactory with all services initialized
    pub fn new(bot: Bot, settings: Settings, db: DatabaseService) -> Self {
        let directory: Arc<dyn ChatDirectory> = Arc::new(TelegramDirectory::new(
            bot,
            Duration::from_secs(settings.directory.timeout_seconds),
        ));
        Self::with_directory(settings, db, directory)
    }

    /// Wire the services around a caller-supplied directory
    pub fn with_directory(
        settings: Settings,
        db: DatabaseService,
        directory: Arc<dyn ChatDirectory>,
    ) -> Self {
        let permissions = PermissionService::new(db.clone(), directory.clone());
        let bot_settings = SettingsService::new(db.settings.clone(), settings.joins.clone());

        Self {
            db,
            directory,
            permissions,
            settings: bot_settings,
        }
    }
}
