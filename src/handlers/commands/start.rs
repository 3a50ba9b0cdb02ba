//! /start command handler

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::debug;
use crate::i18n::{I18n, TranslationParams};
use crate::middleware::SessionContext;
use crate::utils::errors::Result;

/// Greet the user in private chat.
///
/// The session stage has already made sure the user row exists and that a
/// language is known; a first contact never reaches this handler because it
/// is answered with the language prompt instead.
pub async fn handle_start(
    bot: Bot,
    msg: Message,
    context: SessionContext,
    i18n: Arc<I18n>,
) -> Result<()> {
    if !msg.chat.is_private() {
        debug!(chat_id = msg.chat.id.0, "Ignoring /start outside private chat");
        return Ok(());
    }

    let name = context
        .user
        .as_ref()
        .map(|user| user.display_name())
        .unwrap_or_default();

    let mut params = TranslationParams::new();
    params.insert("name".to_string(), name);

    bot.send_message(
        msg.chat.id,
        i18n.t("commands.start.welcome", &context.language, Some(&params)),
    )
    .await?;
    Ok(())
}
