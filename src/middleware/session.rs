//! Session and language resolution
//!
//! Guarantees, before a handler body runs, that the acting user or chat
//! record exists, that banned actors are dropped without a reply, and that
//! a language for rendering replies is resolved. Brand-new private users
//! get a language prompt instead of normal processing.

use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, InlineKeyboardButton, InlineKeyboardMarkup, Message};
use tracing::{debug, info, warn};
use crate::database::DatabaseService;
use crate::i18n::I18n;
use crate::models::chat::{kind_of, Chat, CreateChatRequest};
use crate::models::user::User;
use crate::services::directory::ChatDirectory;
use crate::utils::errors::Result;

/// What the session layer decided about an incoming event.
#[derive(Debug, Clone)]
pub enum SessionStage {
    /// Run the handler with this resolved context
    Proceed(SessionContext),
    /// Drop the event without any reply
    Drop,
    /// A language prompt was sent instead of normal processing
    PromptedForLanguage,
}

/// Records and language resolved for the acting side of an event.
#[derive(Debug, Clone)]
pub struct SessionContext {
    pub user: Option<User>,
    pub chat: Option<Chat>,
    pub language: String,
}

#[derive(Clone)]
pub struct SessionMiddleware {
    db: DatabaseService,
    directory: Arc<dyn ChatDirectory>,
    i18n: Arc<I18n>,
}

impl SessionMiddleware {
    pub fn new(db: DatabaseService, directory: Arc<dyn ChatDirectory>, i18n: Arc<I18n>) -> Self {
        Self { db, directory, i18n }
    }

    /// Resolve the session for an incoming message
    pub async fn prepare_message(&self, bot: &Bot, msg: &Message) -> Result<SessionStage> {
        if msg.chat.is_private() {
            self.prepare_private(bot, msg).await
        } else {
            self.prepare_group(msg).await
        }
    }

    /// Resolve the session for a callback query
    pub async fn prepare_callback(&self, query: &CallbackQuery) -> Result<SessionStage> {
        let from = &query.from;
        let user = self
            .db
            .initialize_user(from.id.0 as i64, from.username.clone(), Some(from.full_name()))
            .await?;

        if user.is_banned {
            debug!(user_id = user.user_id, "Dropping callback from banned user");
            return Ok(SessionStage::Drop);
        }

        let language = self.i18n.language_or_default(user.language.as_deref()).to_string();
        Ok(SessionStage::Proceed(SessionContext {
            user: Some(user),
            chat: None,
            language,
        }))
    }

    async fn prepare_group(&self, msg: &Message) -> Result<SessionStage> {
        let chat = self
            .db
            .initialize_chat(CreateChatRequest {
                chat_id: msg.chat.id.0,
                chat_type: kind_of(&msg.chat).to_string(),
                chat_title: msg.chat.title().map(str::to_string),
                language: None,
                chat_permissions: None,
            })
            .await?;

        if chat.is_banned {
            info!(chat_id = chat.chat_id, "Leaving banned chat");
            if let Err(e) = self.directory.leave_chat(chat.chat_id).await {
                warn!(chat_id = chat.chat_id, error = %e, "Failed to leave banned chat");
            }
            return Ok(SessionStage::Drop);
        }

        let language = self.i18n.language_or_default(chat.language.as_deref()).to_string();
        Ok(SessionStage::Proceed(SessionContext {
            user: None,
            chat: Some(chat),
            language,
        }))
    }

    async fn prepare_private(&self, bot: &Bot, msg: &Message) -> Result<SessionStage> {
        let from = match msg.from.as_ref() {
            Some(from) => from,
            None => return Ok(SessionStage::Drop),
        };

        let user = self
            .db
            .initialize_user(from.id.0 as i64, from.username.clone(), Some(from.full_name()))
            .await?;

        if user.is_banned {
            debug!(user_id = user.user_id, "Dropping message from banned user");
            return Ok(SessionStage::Drop);
        }

        if user.language.is_none() {
            self.send_language_prompt(bot, msg.chat.id).await?;
            return Ok(SessionStage::PromptedForLanguage);
        }

        let language = self.i18n.language_or_default(user.language.as_deref()).to_string();
        Ok(SessionStage::Proceed(SessionContext {
            user: Some(user),
            chat: None,
            language,
        }))
    }

    /// Ask the user to pick a language before anything else happens
    pub async fn send_language_prompt(&self, bot: &Bot, chat_id: ChatId) -> Result<()> {
        let default = self.i18n.default_language().to_string();
        let prompt = self.i18n.t("language.select", &default, None);

        bot.send_message(chat_id, prompt)
            .reply_markup(self.language_keyboard())
            .await?;
        Ok(())
    }

    /// One button per supported language, labelled in that language
    pub fn language_keyboard(&self) -> InlineKeyboardMarkup {
        let buttons: Vec<InlineKeyboardButton> = self
            .i18n
            .supported_languages()
            .iter()
            .map(|lang| {
                InlineKeyboardButton::callback(
                    self.i18n.t("language.name", lang, None),
                    format!("lang:{}", lang),
                )
            })
            .collect();

        InlineKeyboardMarkup::new([buttons])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;
    use crate::config::I18nConfig;
    use crate::models::user::UpdateUserRequest;
    use crate::utils::errors::DirectoryError;

    struct NoDirectory;

    #[async_trait::async_trait]
    impl ChatDirectory for NoDirectory {
        async fn fetch_chat_info(&self, _chat_id: i64) -> std::result::Result<crate::services::ChatInfo, DirectoryError> {
            Err(DirectoryError::NotFound)
        }

        async fn fetch_admin_list(&self, _chat_id: i64) -> std::result::Result<Vec<crate::models::admin::ChatAdmin>, DirectoryError> {
            Err(DirectoryError::NotFound)
        }

        async fn leave_chat(&self, _chat_id: i64) -> std::result::Result<(), DirectoryError> {
            Ok(())
        }
    }

    async fn middleware() -> SessionMiddleware {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();

        let i18n = I18n::new(&I18nConfig {
            default_language: "en".to_string(),
            supported_languages: vec!["en".to_string(), "he".to_string()],
            locales_path: "locales".to_string(),
        });

        SessionMiddleware::new(
            DatabaseService::new(pool),
            Arc::new(NoDirectory),
            Arc::new(i18n),
        )
    }

    fn callback_from(user_id: i64) -> CallbackQuery {
        serde_json::from_value(json!({
            "id": "42",
            "from": {"id": user_id, "is_bot": false, "first_name": "Test"},
            "chat_instance": "instance",
            "data": "bot:back"
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_callback_creates_user_and_proceeds() {
        let middleware = middleware().await;

        let stage = middleware.prepare_callback(&callback_from(7)).await.unwrap();
        match stage {
            SessionStage::Proceed(ctx) => {
                assert_eq!(ctx.user.unwrap().user_id, 7);
                assert_eq!(ctx.language, "en");
            }
            other => panic!("unexpected stage: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_callback_from_banned_user_is_dropped() {
        let middleware = middleware().await;
        middleware.db.initialize_user(7, None, None).await.unwrap();
        middleware.db.users.set_ban_status(7, true).await.unwrap();

        let stage = middleware.prepare_callback(&callback_from(7)).await.unwrap();
        assert!(matches!(stage, SessionStage::Drop));
    }

    #[tokio::test]
    async fn test_callback_uses_stored_language() {
        let middleware = middleware().await;
        middleware.db.initialize_user(7, None, None).await.unwrap();
        middleware
            .db
            .users
            .update(7, UpdateUserRequest { language: Some("he".to_string()), ..Default::default() })
            .await
            .unwrap();

        let stage = middleware.prepare_callback(&callback_from(7)).await.unwrap();
        match stage {
            SessionStage::Proceed(ctx) => assert_eq!(ctx.language, "he"),
            other => panic!("unexpected stage: {:?}", other),
        }
    }
}
