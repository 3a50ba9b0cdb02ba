//! Message handlers module
//!
//! Handles wait-input conversations and the service messages the bot keeps
//! records for.

pub mod moderation;

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::{debug, warn};
use crate::i18n::I18n;
use crate::middleware::{SessionMiddleware, SessionStage};
use crate::models::chat::kind_of;
use crate::models::CreateChatRequest;
use crate::services::ServiceFactory;
use crate::state::WaitInput;
use crate::utils::errors::Result;

/// Decide whether a private text message belongs to an active input flow.
///
/// Runs as a routing filter ahead of command dispatch so typed identifiers
/// and `/cancel` are consumed by the flow instead of the command tree.
pub async fn wait_input_active(msg: Message, services: Arc<ServiceFactory>) -> bool {
    if !msg.chat.is_private() || msg.text().is_none() {
        return false;
    }
    let user_id = match msg.from.as_ref() {
        Some(from) => from.id.0 as i64,
        None => return false,
    };

    match services.db.users.find_by_id(user_id).await {
        Ok(Some(user)) => user.wait_input.is_some(),
        Ok(None) => false,
        Err(e) => {
            warn!(user_id = user_id, error = %e, "Wait-input lookup failed");
            false
        }
    }
}

/// Handle one message of an active input flow
pub async fn handle_wait_input(
    bot: Bot,
    msg: Message,
    services: ServiceFactory,
    session: SessionMiddleware,
    i18n: Arc<I18n>,
) -> Result<()> {
    let context = match session.prepare_message(&bot, &msg).await? {
        SessionStage::Proceed(context) => context,
        SessionStage::Drop | SessionStage::PromptedForLanguage => return Ok(()),
    };
    let user = match context.user.as_ref() {
        Some(user) => user.clone(),
        None => return Ok(()),
    };
    let text = match msg.text() {
        Some(text) => text.trim().to_string(),
        None => return Ok(()),
    };

    if text == "/cancel" {
        services.db.users.set_wait_input(user.user_id, None).await?;
        bot.send_message(msg.chat.id, i18n.t("moderation.cancelled", &context.language, None))
            .await?;
        super::callbacks::settings::send_panel(&bot, msg.chat.id, &services, &i18n, &context.language)
            .await?;
        return Ok(());
    }

    let tag = match user.wait_input.as_deref().and_then(WaitInput::parse) {
        Some(tag) => tag,
        None => {
            // A tag this build does not know; drop it so routing stops
            // diverting messages here.
            warn!(user_id = user.user_id, tag = ?user.wait_input, "Clearing unknown wait-input tag");
            services.db.users.set_wait_input(user.user_id, None).await?;
            return Ok(());
        }
    };

    moderation::handle_moderation_input(bot, msg, tag, &text, context, services, i18n).await
}

/// Handle messages nothing else claimed.
///
/// The session stage still runs so group records stay current and banned
/// chats are left; in private the user gets a pointer at the commands.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    session: SessionMiddleware,
    i18n: Arc<I18n>,
) -> Result<()> {
    let context = match session.prepare_message(&bot, &msg).await? {
        SessionStage::Proceed(context) => context,
        SessionStage::Drop | SessionStage::PromptedForLanguage => return Ok(()),
    };

    if msg.chat.is_private() {
        bot.send_message(msg.chat.id, i18n.t("messages.use_commands", &context.language, None))
            .await?;
    }

    Ok(())
}

/// Keep the stored title current when a chat is renamed
pub async fn handle_new_chat_title(msg: Message, services: ServiceFactory) -> Result<()> {
    let title = match msg.new_chat_title() {
        Some(title) => title,
        None => return Ok(()),
    };
    debug!(chat_id = msg.chat.id.0, title = %title, "Chat title changed");

    // The rename may be the first thing the bot sees from this chat.
    services
        .db
        .initialize_chat(CreateChatRequest {
            chat_id: msg.chat.id.0,
            chat_type: kind_of(&msg.chat).to_string(),
            chat_title: Some(title.to_string()),
            language: None,
            chat_permissions: None,
        })
        .await?;
    services.db.chats.set_title(msg.chat.id.0, title).await?;
    Ok(())
}
