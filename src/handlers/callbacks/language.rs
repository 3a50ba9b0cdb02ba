//! Language selection callbacks

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{ChatId, Message};
use tracing::{info, warn};
use crate::i18n::{I18n, TranslationParams};
use crate::middleware::SessionContext;
use crate::models::UpdateUserRequest;
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Apply a `lang:<code>` button press to the acting user.
///
/// A first-time pick also delivers the welcome message the session stage
/// held back while no language was known.
pub async fn handle_language_selection(
    bot: Bot,
    origin: Option<Message>,
    code: &str,
    context: SessionContext,
    services: ServiceFactory,
    i18n: Arc<I18n>,
) -> Result<()> {
    let user = match context.user {
        Some(user) => user,
        None => return Ok(()),
    };

    if !i18n.is_language_supported(code) {
        warn!(user_id = user.user_id, language = %code, "Unsupported language in callback data");
        return Ok(());
    }

    let first_choice = user.language.is_none();
    services
        .db
        .users
        .update(
            user.user_id,
            UpdateUserRequest {
                language: Some(code.to_string()),
                ..Default::default()
            },
        )
        .await?;
    info!(user_id = user.user_id, language = %code, "User language changed");

    let confirmation = i18n.t("language.changed", code, None);
    match origin {
        // Replace the prompt in place so its keyboard cannot be pressed
        // again.
        Some(message) if message.chat.is_private() => {
            bot.edit_message_text(message.chat.id, message.id, confirmation)
                .await?;
        }
        _ => {
            bot.send_message(ChatId(user.user_id), confirmation).await?;
        }
    }

    if first_choice {
        let mut params = TranslationParams::new();
        params.insert("name".to_string(), user.display_name());
        bot.send_message(
            ChatId(user.user_id),
            i18n.t("commands.start.welcome", code, Some(&params)),
        )
        .await?;
    }

    Ok(())
}
