//! Owner settings panel
//!
//! Rendering and callback handling for the `bot:` namespace. Every action
//! here is restricted to the stored owner; presses from anyone else are
//! dropped without a reply.

use std::sync::Arc;
use serde::Serialize;
use teloxide::prelude::*;
use teloxide::types::{ChatId, InlineKeyboardButton, InlineKeyboardMarkup, InputFile, Message};
use tracing::{debug, info, warn};
use crate::i18n::{I18n, TranslationParams};
use crate::middleware::SessionContext;
use crate::models::BotSettings;
use crate::services::ServiceFactory;
use crate::state::WaitInput;
use crate::utils::errors::Result;

/// Send a fresh panel message
pub async fn send_panel(
    bot: &Bot,
    chat_id: ChatId,
    services: &ServiceFactory,
    i18n: &I18n,
    language: &str,
) -> Result<()> {
    let settings = services.settings.get().await?;
    bot.send_message(chat_id, i18n.t("panel.title", language, None))
        .reply_markup(panel_keyboard(&settings, i18n, language))
        .await?;
    Ok(())
}

/// Handle one `bot:<action>` press
pub async fn handle_panel_action(
    bot: Bot,
    origin: Option<Message>,
    actions: &[&str],
    context: SessionContext,
    services: ServiceFactory,
    i18n: Arc<I18n>,
) -> Result<()> {
    let user = match context.user {
        Some(user) => user,
        None => return Ok(()),
    };
    let language = context.language;

    let settings = services.settings.get().await?;
    if settings.owner_id != Some(user.user_id) {
        debug!(user_id = user.user_id, "Ignoring panel action from non-owner");
        return Ok(());
    }

    let chat_id = origin
        .as_ref()
        .map(|message| message.chat.id)
        .unwrap_or(ChatId(user.user_id));

    match actions.first().copied() {
        Some("statistics") => {
            show_statistics(&bot, origin.as_ref(), chat_id, &services, &i18n, &language).await
        }
        Some(field @ ("can_join_group" | "can_join_channel")) => {
            let updated = services.settings.toggle(field).await?;
            info!(
                owner_id = user.user_id,
                field = field,
                "Join policy toggled"
            );
            render_panel(&bot, origin.as_ref(), chat_id, &updated, &i18n, &language).await
        }
        Some("users") => {
            let users = services.db.users.get_all().await?;
            send_export(&bot, chat_id, &users, "users.json", &i18n, &language).await
        }
        Some("chats") => {
            let chats = services.db.chats.get_all().await?;
            send_export(&bot, chat_id, &chats, "chats.json", &i18n, &language).await
        }
        Some("banid") => {
            begin_wait_input(&bot, origin.as_ref(), chat_id, user.user_id, WaitInput::BanId, &services, &i18n, &language)
                .await
        }
        Some("unbanid") => {
            begin_wait_input(&bot, origin.as_ref(), chat_id, user.user_id, WaitInput::UnbanId, &services, &i18n, &language)
                .await
        }
        Some("back") => render_panel(&bot, origin.as_ref(), chat_id, &settings, &i18n, &language).await,
        other => {
            warn!(user_id = user.user_id, action = ?other, "Unknown panel action");
            Ok(())
        }
    }
}

/// Redraw the panel over the pressed message, or send a new one when the
/// original is no longer accessible.
async fn render_panel(
    bot: &Bot,
    origin: Option<&Message>,
    chat_id: ChatId,
    settings: &BotSettings,
    i18n: &I18n,
    language: &str,
) -> Result<()> {
    let text = i18n.t("panel.title", language, None);
    let keyboard = panel_keyboard(settings, i18n, language);

    match origin {
        Some(message) => {
            bot.edit_message_text(message.chat.id, message.id, text)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, text).reply_markup(keyboard).await?;
        }
    }
    Ok(())
}

fn panel_keyboard(settings: &BotSettings, i18n: &I18n, language: &str) -> InlineKeyboardMarkup {
    let state_label = |enabled: bool| {
        let key = if enabled { "panel.state_on" } else { "panel.state_off" };
        i18n.t(key, language, None)
    };

    let mut group_params = TranslationParams::new();
    group_params.insert("state".to_string(), state_label(settings.can_join_group));
    let mut channel_params = TranslationParams::new();
    channel_params.insert("state".to_string(), state_label(settings.can_join_channel));

    InlineKeyboardMarkup::new(vec![
        vec![InlineKeyboardButton::callback(
            i18n.t("panel.statistics", language, None),
            "bot:statistics",
        )],
        vec![InlineKeyboardButton::callback(
            i18n.t("panel.join_groups", language, Some(&group_params)),
            "bot:can_join_group",
        )],
        vec![InlineKeyboardButton::callback(
            i18n.t("panel.join_channels", language, Some(&channel_params)),
            "bot:can_join_channel",
        )],
        vec![
            InlineKeyboardButton::callback(i18n.t("panel.ban", language, None), "bot:banid"),
            InlineKeyboardButton::callback(i18n.t("panel.unban", language, None), "bot:unbanid"),
        ],
        vec![
            InlineKeyboardButton::callback(i18n.t("panel.export_users", language, None), "bot:users"),
            InlineKeyboardButton::callback(i18n.t("panel.export_chats", language, None), "bot:chats"),
        ],
    ])
}

async fn show_statistics(
    bot: &Bot,
    origin: Option<&Message>,
    chat_id: ChatId,
    services: &ServiceFactory,
    i18n: &I18n,
    language: &str,
) -> Result<()> {
    let mut params = TranslationParams::new();
    params.insert("users".to_string(), services.db.users.count().await?.to_string());
    params.insert(
        "active_users".to_string(),
        services.db.users.count_active().await?.to_string(),
    );
    params.insert("chats".to_string(), services.db.chats.count().await?.to_string());
    params.insert(
        "active_chats".to_string(),
        services.db.chats.count_active().await?.to_string(),
    );

    let text = i18n.t("panel.statistics_body", language, Some(&params));
    let keyboard = InlineKeyboardMarkup::new(vec![vec![InlineKeyboardButton::callback(
        i18n.t("panel.back", language, None),
        "bot:back",
    )]]);

    match origin {
        Some(message) => {
            bot.edit_message_text(message.chat.id, message.id, text)
                .reply_markup(keyboard)
                .await?;
        }
        None => {
            bot.send_message(chat_id, text).reply_markup(keyboard).await?;
        }
    }
    Ok(())
}

/// Ship the stored rows as a pretty-printed JSON document
async fn send_export<T: Serialize>(
    bot: &Bot,
    chat_id: ChatId,
    rows: &[T],
    file_name: &str,
    i18n: &I18n,
    language: &str,
) -> Result<()> {
    if rows.is_empty() {
        bot.send_message(chat_id, i18n.t("panel.export_empty", language, None))
            .await?;
        return Ok(());
    }

    let payload = serde_json::to_vec_pretty(rows)?;
    bot.send_document(
        chat_id,
        InputFile::memory(payload).file_name(file_name.to_string()),
    )
    .await?;
    Ok(())
}

/// Tag the owner and replace the panel with an input prompt
async fn begin_wait_input(
    bot: &Bot,
    origin: Option<&Message>,
    chat_id: ChatId,
    owner_id: i64,
    tag: WaitInput,
    services: &ServiceFactory,
    i18n: &I18n,
    language: &str,
) -> Result<()> {
    services.db.users.set_wait_input(owner_id, Some(tag.as_str())).await?;
    debug!(owner_id = owner_id, tag = %tag, "Wait-input flow opened");

    let key = match tag {
        WaitInput::BanId => "moderation.prompt_ban",
        WaitInput::UnbanId => "moderation.prompt_unban",
    };
    let text = i18n.t(key, language, None);

    // No keyboard on the prompt; /cancel is the way back.
    match origin {
        Some(message) => {
            bot.edit_message_text(message.chat.id, message.id, text).await?;
        }
        None => {
            bot.send_message(chat_id, text).await?;
        }
    }
    Ok(())
}
