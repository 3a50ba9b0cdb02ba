//! Access control gate
//!
//! Pre-checks group-facing handlers against the admin permission cache and
//! answers with a localized rejection when the sender may not act. Private
//! chats and foreign channel authors bypass the check entirely.

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::debug;
use crate::i18n::{I18n, TranslationParams};
use crate::services::{AccessDecision, PermissionService};
use crate::utils::errors::Result;

/// Result of gating one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// Handler may run
    Granted,
    /// Check failed; a rejection reply was sent when one was warranted
    Refused,
}

#[derive(Clone)]
pub struct AccessGate {
    permissions: PermissionService,
    i18n: Arc<I18n>,
}

impl AccessGate {
    pub fn new(permissions: PermissionService, i18n: Arc<I18n>) -> Self {
        Self { permissions, i18n }
    }

    /// Gate a group message on a capability
    pub async fn check_message(
        &self,
        bot: &Bot,
        msg: &Message,
        capability: &str,
        language: &str,
    ) -> Result<AccessOutcome> {
        if msg.chat.is_private() {
            return Ok(AccessOutcome::Granted);
        }

        let chat_id = msg.chat.id.0;
        let acting_id = match (&msg.sender_chat, &msg.from) {
            (Some(sender_chat), _) => {
                if sender_chat.id.0 != chat_id {
                    // Authored by another channel (a linked channel's
                    // auto-forward); there is no admin to check.
                    return Ok(AccessOutcome::Granted);
                }
                sender_chat.id.0
            }
            (None, Some(from)) => from.id.0 as i64,
            (None, None) => return Ok(AccessOutcome::Refused),
        };

        self.check_actor(bot, msg.chat.id, acting_id, capability, language)
            .await
    }

    /// Gate an action whose sender is known by id rather than carried on a
    /// message, such as a button press on a prompt the bot itself posted.
    pub async fn check_actor(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        acting_id: i64,
        capability: &str,
        language: &str,
    ) -> Result<AccessOutcome> {
        if chat_id.is_user() {
            return Ok(AccessOutcome::Granted);
        }

        let decision = self.permissions.resolve(chat_id.0, acting_id, capability).await;
        debug!(
            chat_id = chat_id.0,
            acting_id = acting_id,
            capability = capability,
            decision = ?decision,
            "Access check resolved"
        );

        match decision {
            AccessDecision::Allow => Ok(AccessOutcome::Granted),
            AccessDecision::Deny => {
                // Capability field names have localized display names
                let label = self
                    .i18n
                    .t(&format!("capabilities.{}", capability), language, None);
                let mut params = TranslationParams::new();
                params.insert("capability".to_string(), label);
                self.reply(bot, chat_id, "access.missing_capability", language, Some(&params))
                    .await?;
                Ok(AccessOutcome::Refused)
            }
            AccessDecision::NotAdmin => {
                self.reply(bot, chat_id, "access.not_admin", language, None).await?;
                Ok(AccessOutcome::Refused)
            }
            AccessDecision::BotNotAdmin => {
                self.reply(bot, chat_id, "access.bot_not_admin", language, None).await?;
                Ok(AccessOutcome::Refused)
            }
            AccessDecision::ChatNotFound => {
                self.reply(bot, chat_id, "access.chat_not_found", language, None).await?;
                Ok(AccessOutcome::Refused)
            }
        }
    }

    async fn reply(
        &self,
        bot: &Bot,
        chat_id: ChatId,
        key: &str,
        language: &str,
        params: Option<&TranslationParams>,
    ) -> Result<()> {
        bot.send_message(chat_id, self.i18n.t(key, language, params))
            .await?;
        Ok(())
    }
}
