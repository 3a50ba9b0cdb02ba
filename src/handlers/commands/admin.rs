//! /admin command handler

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use tracing::debug;
use crate::handlers::callbacks::settings::send_panel;
use crate::i18n::I18n;
use crate::middleware::SessionContext;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Show the owner settings panel.
///
/// Only the stored owner gets a reply; everyone else is ignored so the
/// command does not advertise itself.
pub async fn handle_admin(
    bot: Bot,
    msg: Message,
    context: SessionContext,
    services: ServiceFactory,
    i18n: Arc<I18n>,
) -> Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }

    let user_id = match context.user.as_ref() {
        Some(user) => user.user_id,
        None => return Ok(()),
    };

    let settings = services.settings.get().await?;
    if settings.owner_id != Some(user_id) {
        debug!(user_id = user_id, "Ignoring /admin from non-owner");
        return Ok(());
    }

    send_panel(&bot, msg.chat.id, &services, &i18n, &context.language).await
}
