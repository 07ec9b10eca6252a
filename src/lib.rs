//! Report Review Service
//!
//! Similar-report check over a report store with:
//! - Query normalization and hashed cache keys
//! - A TTL cache of candidate ids (in-memory or Redis)
//! - Fuzzy search over titles and tags (in-memory or PostgreSQL)
//! - Role-based route access for the review dashboards

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;

use std::sync::Arc;

use anyhow::Context;
use api::state::AppState;
use config::{CacheSettings, StorageSettings};
use infrastructure::cache::{CacheConfig, CacheFactory, CacheType};
use infrastructure::report::{
    seed_from_file, PostgresConfig, StorageConfig, StorageFactory, StorageType,
};
use infrastructure::services::{SimilarityService, SimilarityServiceConfig};
use tracing::info;

/// Create the application state with default configuration
pub async fn create_app_state() -> anyhow::Result<AppState> {
    create_app_state_with_config(&AppConfig::default()).await
}

/// Create the application state with custom configuration
pub async fn create_app_state_with_config(config: &AppConfig) -> anyhow::Result<AppState> {
    let storage_config = storage_config(&config.storage)?;
    info!(backend = %storage_config.storage_type(), "Initializing report store");

    let backends = StorageFactory::create(&storage_config)
        .await
        .context("Failed to initialize report store")?;

    if let Some(path) = &config.storage.seed_path {
        seed_from_file(backends.repository.as_ref(), path).await?;
    }

    let cache_config = cache_config(&config.cache)?;
    info!(backend = %cache_config.cache_type, "Initializing similarity cache");

    let cache = CacheFactory::new()
        .create(&cache_config)
        .await
        .context("Failed to initialize similarity cache")?;

    let service_config = SimilarityServiceConfig::default()
        .with_ttl(config.similarity.ttl())
        .with_max_candidates(config.similarity.max_candidates)
        .with_fuzzy(config.similarity.fuzzy());

    let similarity_service = SimilarityService::with_config(
        cache.clone(),
        backends.repository.clone(),
        backends.search.clone(),
        service_config,
    );

    Ok(AppState::new(
        Arc::new(similarity_service),
        backends.repository,
        cache,
    ))
}

fn storage_config(settings: &StorageSettings) -> anyhow::Result<StorageConfig> {
    match settings.backend.parse::<StorageType>()? {
        StorageType::InMemory => Ok(StorageConfig::in_memory()),
        StorageType::Postgres => {
            let url = settings
                .database_url
                .as_deref()
                .context("storage.database_url is required for the postgres backend")?;

            Ok(StorageConfig::Postgres(
                PostgresConfig::new(url).with_max_connections(settings.max_connections),
            ))
        }
    }
}

fn cache_config(settings: &CacheSettings) -> anyhow::Result<CacheConfig> {
    let config = match settings.backend.parse::<CacheType>()? {
        CacheType::InMemory => CacheConfig::in_memory(),
        CacheType::Redis => {
            let url = settings
                .redis_url
                .as_deref()
                .context("cache.redis_url is required for the redis backend")?;
            CacheConfig::redis(url)
        }
    };

    Ok(config
        .with_key_prefix(settings.key_prefix.clone())
        .with_max_capacity(settings.max_capacity))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_from_settings() {
        let settings = StorageSettings::default();
        assert!(matches!(
            storage_config(&settings).unwrap(),
            StorageConfig::InMemory
        ));

        let settings = StorageSettings {
            backend: "postgres".to_string(),
            database_url: Some("postgres://localhost/reports".to_string()),
            max_connections: 4,
            ..Default::default()
        };
        match storage_config(&settings).unwrap() {
            StorageConfig::Postgres(pg) => {
                assert_eq!(pg.url, "postgres://localhost/reports");
                assert_eq!(pg.max_connections, 4);
            }
            StorageConfig::InMemory => panic!("expected postgres config"),
        }
    }

    #[test]
    fn test_postgres_requires_url() {
        let settings = StorageSettings {
            backend: "postgres".to_string(),
            ..Default::default()
        };
        assert!(storage_config(&settings).is_err());
    }

    #[test]
    fn test_unknown_backends_are_rejected() {
        let storage = StorageSettings {
            backend: "mongodb".to_string(),
            ..Default::default()
        };
        assert!(storage_config(&storage).is_err());

        let cache = CacheSettings {
            backend: "memcached".to_string(),
            ..Default::default()
        };
        assert!(cache_config(&cache).is_err());
    }

    #[test]
    fn test_cache_config_from_settings() {
        let settings = CacheSettings {
            key_prefix: "review".to_string(),
            max_capacity: 50,
            ..Default::default()
        };
        let config = cache_config(&settings).unwrap();
        assert_eq!(config.cache_type, CacheType::InMemory);
        assert_eq!(config.key_prefix, "review");
        assert_eq!(config.max_capacity, 50);

        let settings = CacheSettings {
            backend: "redis".to_string(),
            ..Default::default()
        };
        assert!(cache_config(&settings).is_err());
    }

    #[tokio::test]
    async fn test_seeded_state_answers_checks() {
        let mut config = AppConfig::default();
        config.storage.seed_path = Some("data/reports.sample.json".to_string());

        let state = create_app_state_with_config(&config).await.unwrap();
        assert_eq!(state.report_repository.count().await.unwrap(), 3);

        let first = state
            .similarity_service
            .check("eco friendly bottle")
            .await
            .unwrap();
        assert!(first.exists);
        assert_eq!(first.reports[0].id.as_str(), "rpt-eco-bottle");

        let second = state
            .similarity_service
            .check("Eco-Friendly  Bottle!!")
            .await
            .unwrap();
        assert_eq!(second.key, first.key);
        assert_eq!(second.outcome.as_str(), "hit");
    }

    #[tokio::test]
    async fn test_missing_seed_file_fails_startup() {
        let mut config = AppConfig::default();
        config.storage.seed_path = Some("data/does-not-exist.json".to_string());

        assert!(create_app_state_with_config(&config).await.is_err());
    }
}
