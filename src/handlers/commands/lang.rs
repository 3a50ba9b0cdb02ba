//! /lang command handler
//!
//! Private chats get a selection keyboard; the choice lands as a `lang:`
//! callback. Group chats take the code inline (`/lang en`) and the change is
//! gated on the sender's admin capabilities.

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::info;
use crate::i18n::{I18n, TranslationParams};
use crate::middleware::{AccessGate, AccessOutcome, SessionContext, SessionMiddleware};
use crate::models::UpdateChatRequest;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Capability required to change a group's language.
pub const LANGUAGE_CAPABILITY: &str = "can_restrict_members";

pub async fn handle_lang(
    bot: Bot,
    msg: Message,
    code: String,
    context: SessionContext,
    services: ServiceFactory,
    session: SessionMiddleware,
    gate: AccessGate,
    i18n: Arc<I18n>,
) -> Result<()> {
    if msg.chat.is_private() {
        bot.send_message(msg.chat.id, i18n.t("language.select", &context.language, None))
            .reply_markup(session.language_keyboard())
            .await?;
        return Ok(());
    }

    if code.is_empty() {
        bot.send_message(msg.chat.id, i18n.t("language.usage", &context.language, None))
            .await?;
        return Ok(());
    }

    if !i18n.is_language_supported(&code) {
        let mut params = TranslationParams::new();
        params.insert("language".to_string(), code);
        bot.send_message(
            msg.chat.id,
            i18n.t("language.unsupported", &context.language, Some(&params)),
        )
        .await?;
        return Ok(());
    }

    let outcome = gate
        .check_message(&bot, &msg, LANGUAGE_CAPABILITY, &context.language)
        .await?;
    if outcome == AccessOutcome::Refused {
        return Ok(());
    }

    services
        .db
        .chats
        .update(
            msg.chat.id.0,
            UpdateChatRequest {
                language: Some(code.clone()),
                ..Default::default()
            },
        )
        .await?;
    info!(chat_id = msg.chat.id.0, language = %code, "Chat language changed");

    bot.send_message(msg.chat.id, i18n.t("language.changed", &code, None))
        .await?;
    Ok(())
}
