//! In-memory similarity cache using moka

use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use moka::Expiry;
use moka::future::Cache as MokaCache;
use moka::ops::compute::{CompResult, Op};

use crate::domain::DomainError;
use crate::domain::similarity::{QueryKey, SimilarityCache, SimilarityCacheEntry};

/// Configuration for in-memory cache
#[derive(Debug, Clone)]
pub struct InMemoryCacheConfig {
    /// Maximum number of entries
    pub max_capacity: u64,
}

impl Default for InMemoryCacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl InMemoryCacheConfig {
    /// Creates a new configuration with specified max capacity
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Evicts each entry at its own `expires_at`
struct EntryExpiry;

impl EntryExpiry {
    fn remaining(entry: &SimilarityCacheEntry) -> Option<Duration> {
        Some(entry.remaining_ttl_at(Utc::now()).unwrap_or(Duration::ZERO))
    }
}

impl Expiry<QueryKey, SimilarityCacheEntry> for EntryExpiry {
    fn expire_after_create(
        &self,
        _key: &QueryKey,
        value: &SimilarityCacheEntry,
        _created_at: Instant,
    ) -> Option<Duration> {
        Self::remaining(value)
    }

    fn expire_after_update(
        &self,
        _key: &QueryKey,
        value: &SimilarityCacheEntry,
        _updated_at: Instant,
        _duration_until_expiry: Option<Duration>,
    ) -> Option<Duration> {
        Self::remaining(value)
    }
}

/// Thread-safe in-memory similarity cache
///
/// Features:
/// - Per-entry expiry taken from `expires_at`
/// - Expired entries are never returned, even before moka sweeps them
/// - LRU-like eviction when capacity is reached
#[derive(Debug)]
pub struct InMemorySimilarityCache {
    cache: MokaCache<QueryKey, SimilarityCacheEntry>,
    config: InMemoryCacheConfig,
}

impl InMemorySimilarityCache {
    /// Creates a new in-memory cache with default configuration
    pub fn new() -> Self {
        Self::with_config(InMemoryCacheConfig::default())
    }

    /// Creates a new in-memory cache with the given configuration
    pub fn with_config(config: InMemoryCacheConfig) -> Self {
        let cache = MokaCache::builder()
            .max_capacity(config.max_capacity)
            .expire_after(EntryExpiry)
            .build();

        Self { cache, config }
    }

    pub fn config(&self) -> &InMemoryCacheConfig {
        &self.config
    }
}

impl Default for InMemorySimilarityCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SimilarityCache for InMemorySimilarityCache {
    async fn get(&self, key: &QueryKey) -> Result<Option<SimilarityCacheEntry>, DomainError> {
        match self.cache.get(key).await {
            Some(entry) => {
                if entry.is_expired() {
                    self.cache.remove(key).await;
                    return Ok(None);
                }

                Ok(Some(entry))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, entry: &SimilarityCacheEntry) -> Result<(), DomainError> {
        if entry.is_expired() {
            return Ok(());
        }

        self.cache.insert(entry.key.clone(), entry.clone()).await;
        Ok(())
    }

    async fn touch(&self, entry: &SimilarityCacheEntry) -> Result<bool, DomainError> {
        let at = entry.last_accessed_at;

        let result = self
            .cache
            .entry_by_ref(&entry.key)
            .and_compute_with(|current| {
                let op = match current.map(|current| current.into_value()) {
                    Some(stored) if !stored.is_expired() && stored.last_accessed_at < at => {
                        Op::Put(stored.touched(at))
                    }
                    _ => Op::Nop,
                };
                std::future::ready(op)
            })
            .await;

        Ok(match result {
            CompResult::ReplacedWith(_) => true,
            CompResult::Unchanged(stored) => !stored.value().is_expired(),
            _ => false,
        })
    }

    async fn remove(&self, key: &QueryKey) -> Result<bool, DomainError> {
        Ok(self.cache.remove(key).await.is_some())
    }

    async fn size(&self) -> Result<usize, DomainError> {
        self.cache.run_pending_tasks().await;
        Ok(self.cache.entry_count() as usize)
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}
