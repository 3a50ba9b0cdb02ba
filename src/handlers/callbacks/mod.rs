//! Callback query handlers module
//!
//! This module contains handlers for all inline keyboard button callbacks,
//! routed by the `namespace:action` convention in the callback data.

pub mod language;
pub mod settings;

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, MaybeInaccessibleMessage};
use tracing::{debug, warn};
use crate::i18n::I18n;
use crate::middleware::{SessionMiddleware, SessionStage};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// Route one callback query
pub async fn handle_callback_query(
    bot: Bot,
    query: CallbackQuery,
    services: ServiceFactory,
    session: SessionMiddleware,
    i18n: Arc<I18n>,
) -> Result<()> {
    // Stop the client-side spinner no matter what happens next.
    if let Err(e) = bot.answer_callback_query(query.id.clone()).await {
        warn!(error = %e, "Failed to answer callback query");
    }

    let user_id = query.from.id.0 as i64;
    let context = match session.prepare_callback(&query).await? {
        SessionStage::Proceed(context) => context,
        SessionStage::Drop | SessionStage::PromptedForLanguage => {
            debug!(user_id = user_id, "Callback stopped at the session stage");
            return Ok(());
        }
    };

    let data = match query.data {
        Some(ref data) => data.clone(),
        None => {
            warn!(user_id = user_id, "Callback query without data");
            return Ok(());
        }
    };
    debug!(user_id = user_id, data = %data, "Processing callback query");

    // Panel edits need the message the button lives on; an inaccessible
    // message degrades to sending fresh messages instead.
    let origin = match query.message {
        Some(MaybeInaccessibleMessage::Regular(message)) => Some(*message),
        _ => None,
    };

    let parts: Vec<&str> = data.split(':').collect();
    match parts[0] {
        "lang" => {
            let code = parts.get(1).copied().unwrap_or_default();
            language::handle_language_selection(bot, origin, code, context, services, i18n).await
        }
        "bot" => {
            settings::handle_panel_action(bot, origin, &parts[1..], context, services, i18n).await
        }
        _ => {
            warn!(user_id = user_id, data = %data, "Unknown callback action");
            Ok(())
        }
    }
}
