//! Ban and unban input flows
//!
//! Consumes the owner's next private message while a wait-input tag is set.
//! A valid target acts on the stored record; invalid or unknown targets
//! leave the tag in place so the owner can try again.

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{info, warn};
use crate::handlers::callbacks::settings::send_panel;
use crate::i18n::{I18n, TranslationParams};
use crate::middleware::SessionContext;
use crate::services::ServiceFactory;
use crate::state::WaitInput;
use crate::utils::errors::Result;
use crate::utils::validation;

/// What the typed identifier points at
enum Target {
    Chat(i64),
    User(i64),
    Username(String),
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Applied,
    AlreadyInState,
    Unknown,
    Invalid,
}

fn parse_target(text: &str) -> Option<Target> {
    if validation::is_valid_chat_id(text) {
        text.parse().ok().map(Target::Chat)
    } else if validation::is_valid_user_id(text) {
        text.parse().ok().map(Target::User)
    } else if validation::is_valid_username(text) {
        Some(Target::Username(text.to_string()))
    } else {
        None
    }
}

/// Apply one typed target to the flow named by the tag
pub async fn handle_moderation_input(
    bot: Bot,
    msg: Message,
    tag: WaitInput,
    text: &str,
    context: SessionContext,
    services: ServiceFactory,
    i18n: Arc<I18n>,
) -> Result<()> {
    let owner_id = match context.user.as_ref() {
        Some(user) => user.user_id,
        None => return Ok(()),
    };
    let ban = tag == WaitInput::BanId;

    let outcome = match parse_target(text) {
        Some(target) => apply(&services, target, ban).await?,
        None => Outcome::Invalid,
    };

    let mut params = TranslationParams::new();
    params.insert("target".to_string(), text.to_string());
    let key = match (outcome, ban) {
        (Outcome::Applied, true) => "moderation.banned",
        (Outcome::Applied, false) => "moderation.unbanned",
        (Outcome::AlreadyInState, true) => "moderation.already_banned",
        (Outcome::AlreadyInState, false) => "moderation.not_banned",
        (Outcome::Unknown, _) => "moderation.unknown_target",
        (Outcome::Invalid, _) => "moderation.invalid_target",
    };
    bot.send_message(msg.chat.id, i18n.t(key, &context.language, Some(&params)))
        .await?;

    if outcome == Outcome::Applied {
        info!(owner_id = owner_id, target = %text, ban = ban, "Moderation flow completed");
        services.db.users.set_wait_input(owner_id, None).await?;

        // The typed identifier is not worth keeping in the chat history.
        if let Err(e) = bot.delete_message(msg.chat.id, msg.id).await {
            warn!(error = %e, "Failed to delete the trigger message");
        }

        send_panel(&bot, msg.chat.id, &services, &i18n, &context.language).await?;
    }

    Ok(())
}

async fn apply(services: &ServiceFactory, target: Target, ban: bool) -> Result<Outcome> {
    match target {
        Target::Chat(chat_id) => match services.db.chats.find_by_id(chat_id).await? {
            Some(chat) if chat.is_banned == ban => Ok(Outcome::AlreadyInState),
            Some(chat) => {
                services.db.chats.set_ban_status(chat.chat_id, ban).await?;
                if ban {
                    if let Err(e) = services.directory.leave_chat(chat.chat_id).await {
                        warn!(chat_id = chat.chat_id, error = %e, "Failed to leave banned chat");
                    }
                }
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Unknown),
        },
        Target::User(user_id) => match services.db.users.find_by_id(user_id).await? {
            Some(user) if user.is_banned == ban => Ok(Outcome::AlreadyInState),
            Some(user) => {
                services.db.users.set_ban_status(user.user_id, ban).await?;
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Unknown),
        },
        Target::Username(username) => match services.db.users.find_by_username(&username).await? {
            Some(user) if user.is_banned == ban => Ok(Outcome::AlreadyInState),
            Some(user) => {
                services.db.users.set_ban_status(user.user_id, ban).await?;
                Ok(Outcome::Applied)
            }
            None => Ok(Outcome::Unknown),
        },
    }
}
