//! Command handlers module
//!
//! This module contains handlers for all bot commands like /start, /help, etc.

pub mod admin;
pub mod help;
pub mod lang;
pub mod start;

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::Message;
use teloxide::utils::command::{BotCommands, ParseError};
use tracing::debug;
use crate::i18n::I18n;
use crate::middleware::{AccessGate, SessionContext, SessionMiddleware, SessionStage};
use crate::services::ServiceFactory;
use crate::utils::errors::Result;

/// All available bot commands
#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase", description = "chatwarden commands:")]
pub enum Command {
    #[command(description = "Start the bot and show welcome message")]
    Start,
    #[command(description = "Show help information")]
    Help,
    #[command(description = "Change language", parse_with = language_argument)]
    Lang(String),
    #[command(description = "Owner settings panel")]
    Admin,
    #[command(description = "Abort the current input flow")]
    Cancel,
}

/// Keep a bare `/lang` parseable; the handler decides what an empty
/// argument means for the current chat kind.
fn language_argument(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

/// Main command dispatcher
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: ServiceFactory,
    session: SessionMiddleware,
    gate: AccessGate,
    i18n: Arc<I18n>,
) -> Result<()> {
    let context = match session.prepare_message(&bot, &msg).await? {
        SessionStage::Proceed(context) => context,
        SessionStage::Drop | SessionStage::PromptedForLanguage => {
            debug!(chat_id = msg.chat.id.0, "Command stopped at the session stage");
            return Ok(());
        }
    };

    match cmd {
        Command::Start => start::handle_start(bot, msg, context, i18n).await,
        Command::Help => help::handle_help(bot, msg, context, i18n).await,
        Command::Lang(code) => {
            lang::handle_lang(bot, msg, code, context, services, session, gate, i18n).await
        }
        Command::Admin => admin::handle_admin(bot, msg, context, services, i18n).await,
        Command::Cancel => handle_cancel(bot, msg, context, i18n).await,
    }
}

/// `/cancel` outside an input flow; an active flow consumes the command in
/// the wait-input routing before command dispatch ever sees it.
async fn handle_cancel(
    bot: Bot,
    msg: Message,
    context: SessionContext,
    i18n: Arc<I18n>,
) -> Result<()> {
    if !msg.chat.is_private() {
        return Ok(());
    }

    bot.send_message(
        msg.chat.id,
        i18n.t("moderation.nothing_to_cancel", &context.language, None),
    )
    .await?;
    Ok(())
}
