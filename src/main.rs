//! chatwarden Telegram bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::dispatching::UpdateHandler;
use teloxide::prelude::*;
use teloxide::types::{ChatId, ChatMemberUpdated, Message, Update};
use tracing::{error, info, warn};

use chatwarden::{
    config::Settings,
    database::{connection, DatabaseService},
    handlers::{callbacks, commands, commands::Command, membership, messages},
    i18n::I18n,
    middleware::{AccessGate, SessionMiddleware},
    services::ServiceFactory,
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging; the guard must stay alive for file output to
    // keep flushing.
    let _logging_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", chatwarden::info());

    // Initialize database connection
    info!("Connecting to database...");
    let db_config = connection::DatabaseConfig {
        url: settings.database.url.clone(),
        max_connections: settings.database.max_connections,
        min_connections: settings.database.min_connections,
        ..connection::DatabaseConfig::default()
    };
    let db_pool = connection::create_pool(&db_config).await?;
    connection::run_migrations(&db_pool).await?;
    let database_service = DatabaseService::new(db_pool);

    // Initialize i18n system
    info!("Loading translations...");
    let mut i18n = I18n::new(&settings.i18n);
    i18n.load_translations().await?;
    let i18n = Arc::new(i18n);

    // Initialize bot and services
    let bot = Bot::new(&settings.bot.token);
    let services = ServiceFactory::new(bot.clone(), settings.clone(), database_service.clone());
    let session = SessionMiddleware::new(
        database_service.clone(),
        services.directory.clone(),
        i18n.clone(),
    );
    let gate = AccessGate::new(services.permissions.clone(), i18n.clone());

    // The configured owner wins over whatever the store remembers.
    services.settings.reconcile_owner(settings.bot.owner_id).await?;
    notify_owner(&bot, &database_service, &i18n, settings.bot.owner_id).await;

    info!("Setting up bot handlers...");
    let handler = create_handler();

    let mut dispatcher = Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(services), session, gate, i18n])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("chatwarden is ready");
    dispatcher.dispatch().await;

    info!("chatwarden has been shut down");
    Ok(())
}

/// Tell the owner the bot came up
async fn notify_owner(bot: &Bot, db: &DatabaseService, i18n: &I18n, owner_id: i64) {
    let language = match db.users.find_by_id(owner_id).await {
        Ok(Some(user)) => i18n.language_or_default(user.language.as_deref()).to_string(),
        _ => i18n.default_language().to_string(),
    };

    if let Err(e) = bot
        .send_message(ChatId(owner_id), i18n.t("owner.startup", &language, None))
        .await
    {
        warn!(owner_id = owner_id, error = %e, "Failed to notify the owner");
    }
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry()
        .branch(
            Update::filter_message()
                .branch(
                    // Service messages carrying a renamed title
                    dptree::filter(|msg: Message| msg.new_chat_title().is_some())
                        .endpoint(handle_title_changes),
                )
                .branch(
                    // Active input flows run ahead of command parsing so the
                    // typed identifier (or /cancel) is consumed by the flow
                    dptree::filter_async(messages::wait_input_active)
                        .endpoint(handle_wait_input_messages),
                )
                .branch(
                    dptree::entry()
                        .filter_command::<Command>()
                        .endpoint(handle_commands),
                )
                .branch(dptree::endpoint(handle_messages)),
        )
        .branch(Update::filter_callback_query().endpoint(handle_callbacks))
        .branch(Update::filter_my_chat_member().endpoint(handle_own_membership_updates))
        .branch(Update::filter_chat_member().endpoint(handle_member_updates))
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    services: Arc<ServiceFactory>,
    session: SessionMiddleware,
    gate: AccessGate,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = commands::handle_command(bot, msg, cmd, services, session, gate, i18n).await {
        error!(error = %e, "Error handling command");
        return Err(e.into());
    }
    Ok(())
}

/// Handle messages of an active wait-input flow
async fn handle_wait_input_messages(
    bot: Bot,
    msg: Message,
    services: Arc<ServiceFactory>,
    session: SessionMiddleware,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = messages::handle_wait_input(bot, msg, services, session, i18n).await {
        error!(error = %e, "Error handling wait-input message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    session: SessionMiddleware,
    i18n: Arc<I18n>,
) -> HandlerResult {
    if let Err(e) = messages::handle_message(bot, msg, session, i18n).await {
        error!(error = %e, "Error handling message");
        return Err(e.into());
    }
    Ok(())
}

/// Handle chat renames
async fn handle_title_changes(msg: Message, services: Arc<ServiceFactory>) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = messages::handle_new_chat_title(msg, services).await {
        error!(error = %e, "Error handling chat title change");
        return Err(e.into());
    }
    Ok(())
}

/// Handle callback queries
async fn handle_callbacks(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    services: Arc<ServiceFactory>,
    session: SessionMiddleware,
    i18n: Arc<I18n>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = callbacks::handle_callback_query(bot, query, services, session, i18n).await {
        error!(error = %e, "Error handling callback query");
        return Err(e.into());
    }
    Ok(())
}

/// Handle updates about the bot's own membership
async fn handle_own_membership_updates(
    update: ChatMemberUpdated,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = membership::handle_own_membership(update, services).await {
        error!(error = %e, "Error handling own membership update");
        return Err(e.into());
    }
    Ok(())
}

/// Handle other members' status changes
async fn handle_member_updates(
    update: ChatMemberUpdated,
    services: Arc<ServiceFactory>,
) -> HandlerResult {
    let services = (*services).clone();

    if let Err(e) = membership::handle_member_change(update, services).await {
        error!(error = %e, "Error handling member update");
        return Err(e.into());
    }
    Ok(())
}
