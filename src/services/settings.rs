//! Bot settings service
//!
//! Process-wide access to the singleton settings row behind a day-long
//! in-process cache. Writes hit the store first and only then swap the
//! cache, so a reader can never observe a cached value newer than the
//! durable row.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};
use crate::config::JoinPolicyConfig;
use crate::database::repositories::SettingsRepository;
use crate::models::bot_settings::{BotSettings, UpdateBotSettingsRequest};
use crate::utils::errors::ChatWardenError;

/// How long a cached settings row keeps being served.
pub const SETTINGS_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

#[derive(Clone)]
pub struct SettingsService {
    repo: SettingsRepository,
    join_defaults: JoinPolicyConfig,
    cache: Arc<RwLock<Option<CachedSettings>>>,
}

#[derive(Debug, Clone)]
struct CachedSettings {
    settings: BotSettings,
    loaded_at: Instant,
}

impl SettingsService {
    pub fn new(repo: SettingsRepository, join_defaults: JoinPolicyConfig) -> Self {
        Self {
            repo,
            join_defaults,
            cache: Arc::new(RwLock::new(None)),
        }
    }

    /// Current settings, served from cache while it is younger than a day
    pub async fn get(&self) -> Result<BotSettings, ChatWardenError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.as_ref() {
                if cached.loaded_at.elapsed() < SETTINGS_CACHE_TTL {
                    return Ok(cached.settings.clone());
                }
            }
        }

        debug!("Settings cache empty or expired, loading from store");
        self.reload().await
    }

    /// Drop the cached row; the next read loads from the store
    pub async fn invalidate(&self) {
        *self.cache.write().await = None;
    }

    /// Persist the given fields, then refresh the cache with the result
    pub async fn update(&self, request: UpdateBotSettingsRequest) -> Result<BotSettings, ChatWardenError> {
        self.ensure_row().await?;
        let settings = self.repo.update(request).await?;
        self.swap_cache(settings.clone()).await;
        Ok(settings)
    }

    /// Flip one boolean settings field by name
    pub async fn toggle(&self, field: &str) -> Result<BotSettings, ChatWardenError> {
        let current = self.get().await?;

        let request = match field {
            "can_join_group" => UpdateBotSettingsRequest {
                can_join_group: Some(!current.can_join_group),
                ..Default::default()
            },
            "can_join_channel" => UpdateBotSettingsRequest {
                can_join_channel: Some(!current.can_join_channel),
                ..Default::default()
            },
            _ => return Err(ChatWardenError::UnknownSetting(field.to_string())),
        };

        info!(field = field, "Toggling settings field");
        self.update(request).await
    }

    /// Make the stored owner match the configured one. The configuration
    /// wins over whatever the store remembers.
    pub async fn reconcile_owner(&self, configured_owner: i64) -> Result<BotSettings, ChatWardenError> {
        let current = self.get().await?;
        if current.owner_id == Some(configured_owner) {
            return Ok(current);
        }

        info!(owner_id = configured_owner, "Updating stored owner to the configured identity");
        self.update(UpdateBotSettingsRequest {
            owner_id: Some(configured_owner),
            ..Default::default()
        })
        .await
    }

    async fn ensure_row(&self) -> Result<(), ChatWardenError> {
        self.repo
            .load_or_create(self.join_defaults.allow_groups, self.join_defaults.allow_channels)
            .await?;
        Ok(())
    }

    async fn reload(&self) -> Result<BotSettings, ChatWardenError> {
        let settings = self
            .repo
            .load_or_create(self.join_defaults.allow_groups, self.join_defaults.allow_channels)
            .await?;
        self.swap_cache(settings.clone()).await;
        Ok(settings)
    }

    async fn swap_cache(&self, settings: BotSettings) {
        let mut cache = self.cache.write().await;
        *cache = Some(CachedSettings {
            settings,
            loaded_at: Instant::now(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::SqlitePool;
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

    fn join_defaults() -> JoinPolicyConfig {
        JoinPolicyConfig {
            allow_groups: true,
            allow_channels: true,
        }
    }

    async fn service() -> (SettingsService, SettingsRepository) {
        let repo = SettingsRepository::new(setup().await);
        (SettingsService::new(repo.clone(), join_defaults()), repo)
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_serves_until_expiry() {
        let (service, repo) = service().await;

        let first = service.get().await.unwrap();
        assert!(first.can_join_group);

        // A write behind the service's back stays invisible until the TTL
        // runs out.
        repo.update(UpdateBotSettingsRequest {
            can_join_group: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(service.get().await.unwrap().can_join_group);

        tokio::time::advance(SETTINGS_CACHE_TTL + Duration::from_secs(1)).await;
        assert!(!service.get().await.unwrap().can_join_group);
    }

    #[tokio::test]
    async fn test_invalidate_forces_reload() {
        let (service, repo) = service().await;
        service.get().await.unwrap();

        repo.update(UpdateBotSettingsRequest {
            can_join_channel: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
        assert!(service.get().await.unwrap().can_join_channel);

        service.invalidate().await;
        assert!(!service.get().await.unwrap().can_join_channel);
    }

    #[tokio::test]
    async fn test_toggle_flips_and_persists() {
        let (service, repo) = service().await;

        let toggled = service.toggle("can_join_group").await.unwrap();
        assert!(!toggled.can_join_group);

        // The durable row changed too, not only the cache.
        let stored = repo.load_or_create(true, true).await.unwrap();
        assert!(!stored.can_join_group);

        let again = service.toggle("can_join_group").await.unwrap();
        assert!(again.can_join_group);
    }

    #[tokio::test]
    async fn test_toggle_unknown_field_is_an_error() {
        let (service, _) = service().await;

        let result = service.toggle("can_fly").await;
        assert!(matches!(result, Err(ChatWardenError::UnknownSetting(field)) if field == "can_fly"));
    }

    #[tokio::test]
    async fn test_reconcile_owner_prefers_configuration() {
        let (service, _) = service().await;

        let settings = service.reconcile_owner(42).await.unwrap();
        assert_eq!(settings.owner_id, Some(42));

        // Stored owner differs from the configured one: configuration wins.
        let settings = service.reconcile_owner(43).await.unwrap();
        assert_eq!(settings.owner_id, Some(43));
    }
}
