//! In-memory database setup for the integration suites.
//!
//! Every suite gets a private SQLite memory database run through the real
//! production migrations, so schema drift shows up in tests immediately.

use chrono::{Duration, Utc};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use chatwarden::database::DatabaseService;
use chatwarden::models::{CreateChatRequest, UpdateChatRequest};

pub async fn memory_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory pool should open");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("migrations should apply");
    pool
}

pub async fn test_database() -> (DatabaseService, SqlitePool) {
    let pool = memory_pool().await;
    (DatabaseService::new(pool.clone()), pool)
}

/// Seed a supergroup row; `bot_is_admin` drives the roster-visibility gate.
pub async fn seed_chat(db: &DatabaseService, chat_id: i64, bot_is_admin: bool) {
    db.initialize_chat(CreateChatRequest {
        chat_id,
        chat_type: "supergroup".to_string(),
        chat_title: Some("Seeded Group".to_string()),
        language: None,
        chat_permissions: None,
    })
    .await
    .expect("chat row should insert");

    if bot_is_admin {
        db.chats
            .update(
                chat_id,
                UpdateChatRequest {
                    is_admin: Some(true),
                    ..Default::default()
                },
            )
            .await
            .expect("admin flag should update");
    }
}

/// Backdate the chat's admin snapshot stamp by the given number of hours.
pub async fn age_snapshot(pool: &SqlitePool, chat_id: i64, hours: i64) {
    sqlx::query("UPDATE chats SET last_admins_update = ? WHERE chat_id = ?")
        .bind(Utc::now() - Duration::hours(hours))
        .bind(chat_id)
        .execute(pool)
        .await
        .expect("stamp should update");
}
