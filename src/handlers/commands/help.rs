//! Help command handler

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use crate::i18n::I18n;
use crate::middleware::SessionContext;
use crate::utils::errors::Result;

/// Handle /help command
pub async fn handle_help(
    bot: Bot,
    msg: Message,
    context: SessionContext,
    i18n: Arc<I18n>,
) -> Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }

    bot.send_message(msg.chat.id, i18n.t("commands.help.body", &context.language, None))
        .await?;
    Ok(())
}
