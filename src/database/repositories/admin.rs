//! Admin snapshot repository implementation

use sqlx::SqlitePool;
use sqlx::types::Json;
use chrono::Utc;
use crate::models::admin::{AdminPermission, ChatAdmin, PrivilegeMap};
use crate::utils::errors::ChatWardenError;

#[derive(Clone)]
#[derive(Debug)]
pub struct AdminRepository {
    pool: SqlitePool,
}

impl AdminRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find one admin row for a chat
    pub async fn find(&self, chat_id: i64, admin_id: i64) -> Result<Option<AdminPermission>, ChatWardenError> {
        let row = sqlx::query_as::<_, AdminPermission>(
            "SELECT id, chat_id, admin_id, privileges FROM admins_permissions WHERE chat_id = ? AND admin_id = ?"
        )
        .bind(chat_id)
        .bind(admin_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    /// All admin rows for a chat
    pub async fn list_for_chat(&self, chat_id: i64) -> Result<Vec<AdminPermission>, ChatWardenError> {
        let rows = sqlx::query_as::<_, AdminPermission>(
            "SELECT id, chat_id, admin_id, privileges FROM admins_permissions WHERE chat_id = ? ORDER BY admin_id ASC"
        )
        .bind(chat_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Swap the chat's whole admin roster for a fresh one and stamp the
    /// snapshot time. Runs as a single transaction so readers never see a
    /// half-written roster.
    pub async fn replace_all(&self, chat_id: i64, admins: &[ChatAdmin]) -> Result<(), ChatWardenError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM admins_permissions WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        for admin in admins {
            sqlx::query(
                "INSERT INTO admins_permissions (chat_id, admin_id, privileges) VALUES (?, ?, ?)"
            )
            .bind(chat_id)
            .bind(admin.admin_id)
            .bind(Json(admin.privileges.clone()))
            .execute(&mut *tx)
            .await?;
        }

        sqlx::query("UPDATE chats SET last_admins_update = ? WHERE chat_id = ?")
            .bind(Utc::now())
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Insert or refresh a single admin row. The snapshot stamp is left alone
    /// so the next full refresh still happens on schedule.
    pub async fn upsert_one(
        &self,
        chat_id: i64,
        admin_id: i64,
        privileges: &PrivilegeMap,
    ) -> Result<AdminPermission, ChatWardenError> {
        let row = sqlx::query_as::<_, AdminPermission>(
            r#"
            INSERT INTO admins_permissions (chat_id, admin_id, privileges)
            VALUES (?, ?, ?)
            ON CONFLICT (chat_id, admin_id) DO UPDATE SET
                privileges = EXCLUDED.privileges
            RETURNING id, chat_id, admin_id, privileges
            "#
        )
        .bind(chat_id)
        .bind(admin_id)
        .bind(Json(privileges.clone()))
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Remove one admin row after a demotion
    pub async fn delete_one(&self, chat_id: i64, admin_id: i64) -> Result<bool, ChatWardenError> {
        let result = sqlx::query("DELETE FROM admins_permissions WHERE chat_id = ? AND admin_id = ?")
            .bind(chat_id)
            .bind(admin_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Drop the chat's roster and null the stamp, forcing the next lookup to
    /// refresh from the directory.
    pub async fn clear(&self, chat_id: i64) -> Result<(), ChatWardenError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM admins_permissions WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE chats SET last_admins_update = NULL WHERE chat_id = ?")
            .bind(chat_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::database::repositories::chat::ChatRepository;
    use crate::models::chat::CreateChatRequest;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn setup() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        pool
    }

    async fn seed_chat(pool: &SqlitePool, chat_id: i64) {
        ChatRepository::new(pool.clone())
            .create(CreateChatRequest {
                chat_id,
                chat_type: "supergroup".to_string(),
                chat_title: Some("Test Group".to_string()),
                language: None,
                chat_permissions: None,
            })
            .await
            .unwrap();
    }

    fn admin(admin_id: i64, can_restrict: bool) -> ChatAdmin {
        let mut privileges = HashMap::new();
        privileges.insert("can_restrict_members".to_string(), can_restrict);
        ChatAdmin { admin_id, privileges }
    }

    async fn stamp_of(pool: &SqlitePool, chat_id: i64) -> Option<chrono::DateTime<chrono::Utc>> {
        ChatRepository::new(pool.clone())
            .find_by_id(chat_id)
            .await
            .unwrap()
            .unwrap()
            .last_admins_update
    }

    #[tokio::test]
    async fn test_replace_all_sets_roster_and_stamp() {
        let pool = setup().await;
        seed_chat(&pool, -100).await;
        let repo = AdminRepository::new(pool.clone());

        repo.replace_all(-100, &[admin(1, true), admin(2, false)]).await.unwrap();

        let rows = repo.list_for_chat(-100).await.unwrap();
        assert_eq!(rows.len(), 2);
        assert!(stamp_of(&pool, -100).await.is_some());

        let row = repo.find(-100, 1).await.unwrap().unwrap();
        assert_eq!(row.privileges.get("can_restrict_members"), Some(&true));
    }

    #[tokio::test]
    async fn test_replace_all_drops_departed_admins() {
        let pool = setup().await;
        seed_chat(&pool, -100).await;
        let repo = AdminRepository::new(pool.clone());

        repo.replace_all(-100, &[admin(1, true), admin(2, false)]).await.unwrap();
        repo.replace_all(-100, &[admin(2, true)]).await.unwrap();

        let rows = repo.list_for_chat(-100).await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].admin_id, 2);
        assert_eq!(rows[0].privileges.get("can_restrict_members"), Some(&true));
    }

    #[tokio::test]
    async fn test_upsert_one_leaves_stamp_alone() {
        let pool = setup().await;
        seed_chat(&pool, -100).await;
        let repo = AdminRepository::new(pool.clone());

        repo.replace_all(-100, &[admin(1, true)]).await.unwrap();
        let before = stamp_of(&pool, -100).await;

        repo.upsert_one(-100, 2, &admin(2, false).privileges).await.unwrap();
        let row = repo.upsert_one(-100, 2, &admin(2, true).privileges).await.unwrap();

        assert_eq!(row.privileges.get("can_restrict_members"), Some(&true));
        assert_eq!(repo.list_for_chat(-100).await.unwrap().len(), 2);
        assert_eq!(stamp_of(&pool, -100).await, before);
    }

    #[tokio::test]
    async fn test_delete_one_and_clear() {
        let pool = setup().await;
        seed_chat(&pool, -100).await;
        let repo = AdminRepository::new(pool.clone());

        repo.replace_all(-100, &[admin(1, true), admin(2, false)]).await.unwrap();
        assert!(repo.delete_one(-100, 1).await.unwrap());
        assert!(!repo.delete_one(-100, 1).await.unwrap());
        assert_eq!(repo.list_for_chat(-100).await.unwrap().len(), 1);

        repo.clear(-100).await.unwrap();
        assert!(repo.list_for_chat(-100).await.unwrap().is_empty());
        assert!(stamp_of(&pool, -100).await.is_none());
    }
}
