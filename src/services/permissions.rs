//! Admin permission resolution
//!
//! Answers "may this sender do that in this chat" from the stored admin
//! roster, refreshing the roster from the directory when the snapshot is
//! older than a day. Ambiguous failures resolve to denial, never to access.

use std::collections::HashMap;
use std::sync::Arc;
use chrono::{DateTime, Duration, Utc};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use crate::database::DatabaseService;
use crate::models::chat::{Chat, CreateChatRequest};
use crate::services::directory::ChatDirectory;
use crate::utils::errors::ChatWardenError;

/// Roster snapshots older than this trigger a full refresh.
pub const MAX_SNAPSHOT_AGE_HOURS: i64 = 24;

/// Outcome of an access check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    /// Sender holds the capability (or is the chat itself)
    Allow,
    /// Sender is an admin without the capability, or the check failed closed
    Deny,
    /// Sender is not in the chat's admin roster
    NotAdmin,
    /// Chat is unknown and could not be fetched from the directory
    ChatNotFound,
    /// The bot cannot see the roster without admin rights of its own
    BotNotAdmin,
}

#[derive(Clone)]
pub struct PermissionService {
    db: DatabaseService,
    directory: Arc<dyn ChatDirectory>,
    /// Per-chat guards so concurrent checks share one roster fetch
    refresh_locks: Arc<Mutex<HashMap<i64, Arc<Mutex<()>>>>>,
}

impl PermissionService {
    pub fn new(db: DatabaseService, directory: Arc<dyn ChatDirectory>) -> Self {
        Self {
            db,
            directory,
            refresh_locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Decide whether `admin_id` may perform an action requiring `capability`
    /// in `chat_id`. Never returns an error; failures map to a decision.
    pub async fn resolve(&self, chat_id: i64, admin_id: i64, capability: &str) -> AccessDecision {
        let chat = match self.db.chats.find_by_id(chat_id).await {
            Ok(Some(chat)) => chat,
            Ok(None) => match self.register_chat(chat_id).await {
                Ok(chat) => chat,
                Err(ChatWardenError::Directory(e)) => {
                    warn!(chat_id = chat_id, error = %e, "Chat is unreachable, cannot evaluate access");
                    return AccessDecision::ChatNotFound;
                }
                Err(e) => {
                    error!(chat_id = chat_id, error = %e, "Failed to register chat");
                    return AccessDecision::Deny;
                }
            },
            Err(e) => {
                error!(chat_id = chat_id, error = %e, "Chat lookup failed");
                return AccessDecision::Deny;
            }
        };

        if !chat.is_admin {
            return AccessDecision::BotNotAdmin;
        }

        if is_stale(chat.last_admins_update, Utc::now()) {
            if let Err(e) = self.refresh_roster(chat_id).await {
                return match e {
                    ChatWardenError::Directory(e) => {
                        warn!(chat_id = chat_id, error = %e, "Roster refresh failed, chat unreachable");
                        AccessDecision::ChatNotFound
                    }
                    e => {
                        error!(chat_id = chat_id, error = %e, "Roster refresh failed");
                        AccessDecision::Deny
                    }
                };
            }
        }

        match self.db.admins.find(chat_id, admin_id).await {
            Ok(None) => AccessDecision::NotAdmin,
            // The chat acting as its own admin (anonymous admins) passes
            // without a capability check.
            Ok(Some(_)) if chat_id == admin_id => AccessDecision::Allow,
            Ok(Some(row)) => {
                if row.privileges.get(capability).copied().unwrap_or(false) {
                    AccessDecision::Allow
                } else {
                    AccessDecision::Deny
                }
            }
            Err(e) => {
                error!(chat_id = chat_id, admin_id = admin_id, error = %e, "Admin lookup failed");
                AccessDecision::Deny
            }
        }
    }

    /// First sighting of a chat: pull its metadata and create the row
    async fn register_chat(&self, chat_id: i64) -> Result<Chat, ChatWardenError> {
        let info = self.directory.fetch_chat_info(chat_id).await?;
        info!(chat_id = chat_id, chat_type = %info.chat_type, "Registering newly seen chat");

        self.db
            .initialize_chat(CreateChatRequest {
                chat_id,
                chat_type: info.chat_type,
                chat_title: info.title,
                language: None,
                chat_permissions: info.permissions,
            })
            .await
    }

    /// Replace the stored roster with the live one. The roster fetch happens
    /// before the replace transaction opens, and concurrent callers for the
    /// same chat share a single fetch.
    async fn refresh_roster(&self, chat_id: i64) -> Result<(), ChatWardenError> {
        let chat_lock = {
            let mut locks = self.refresh_locks.lock().await;
            locks.entry(chat_id).or_default().clone()
        };
        let _guard = chat_lock.lock().await;

        // A racing task may have refreshed while this one waited on the lock.
        if let Some(chat) = self.db.chats.find_by_id(chat_id).await? {
            if !is_stale(chat.last_admins_update, Utc::now()) {
                return Ok(());
            }
        }

        let roster = self.directory.fetch_admin_list(chat_id).await?;
        debug!(chat_id = chat_id, admins = roster.len(), "Replacing admin roster");
        self.db.admins.replace_all(chat_id, &roster).await
    }
}

/// A snapshot is stale when it was never taken or is older than a day.
fn is_stale(last_update: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match last_update {
        Some(at) => now.signed_duration_since(at) > Duration::hours(MAX_SNAPSHOT_AGE_HOURS),
        None => true,
    }
}
