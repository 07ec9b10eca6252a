//! Redis similarity cache implementation

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use crate::domain::DomainError;
use crate::domain::similarity::{QueryKey, SimilarityCache, SimilarityCacheEntry};

/// Configuration for Redis cache
#[derive(Debug, Clone)]
pub struct RedisCacheConfig {
    /// Redis connection URL (e.g., "redis://127.0.0.1:6379")
    pub url: String,
    /// Key prefix for namespacing
    pub key_prefix: String,
}

impl Default for RedisCacheConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            key_prefix: "similarity".to_string(),
        }
    }
}

impl RedisCacheConfig {
    /// Creates a new configuration with the given URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Sets the key prefix
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }
}

/// Redis-backed similarity cache
///
/// Each entry is a hash under `{prefix}:{sha256}` holding the entry JSON and
/// the last access time, with a millisecond TTL matching `expires_at` so
/// Redis evicts it on its own.
#[derive(Clone)]
pub struct RedisSimilarityCache {
    connection: ConnectionManager,
    config: RedisCacheConfig,
}

impl fmt::Debug for RedisSimilarityCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisSimilarityCache")
            .field("config", &self.config)
            .field("connection", &"<ConnectionManager>")
            .finish()
    }
}

impl RedisSimilarityCache {
    /// Creates a new Redis cache connection
    pub async fn new(config: RedisCacheConfig) -> Result<Self, DomainError> {
        let client = Client::open(config.url.as_str())
            .map_err(|e| DomainError::cache(format!("Failed to create Redis client: {}", e)))?;

        let connection = ConnectionManager::new(client)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to connect to Redis: {}", e)))?;

        Ok(Self { connection, config })
    }

    fn redis_key(&self, key: &QueryKey) -> String {
        key.namespaced(&self.config.key_prefix)
    }

    fn encode(entry: &SimilarityCacheEntry) -> Result<String, DomainError> {
        serde_json::to_string(entry)
            .map_err(|e| DomainError::cache(format!("Failed to serialize cache entry: {}", e)))
    }

    fn decode(key: &QueryKey, raw: &str) -> Result<SimilarityCacheEntry, DomainError> {
        serde_json::from_str(raw).map_err(|e| {
            DomainError::cache(format!("Failed to deserialize cache entry '{}': {}", key, e))
        })
    }
}

/// Hash field holding the entry JSON
const ENTRY_FIELD: &str = "entry";
/// Hash field holding the last access time, kept apart so a touch never rewrites the entry
const ACCESSED_FIELD: &str = "accessed";

/// Moves `accessed` forward on an existing hash without touching its TTL
const TOUCH_SCRIPT: &str = r#"
if redis.call('EXISTS', KEYS[1]) == 0 then
    return 0
end
local current = redis.call('HGET', KEYS[1], ARGV[1])
if (not current) or current < ARGV[2] then
    redis.call('HSET', KEYS[1], ARGV[1], ARGV[2])
end
return 1
"#;

/// Fixed-width RFC 3339 so stamps compare correctly as strings
fn access_stamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Entry from its JSON with the separately stored access time applied
fn with_access_time(mut entry: SimilarityCacheEntry, accessed: Option<&str>) -> SimilarityCacheEntry {
    if let Some(at) = accessed.and_then(|raw| DateTime::parse_from_rfc3339(raw).ok()) {
        entry.last_accessed_at = at.with_timezone(&Utc);
    }
    entry
}

/// Milliseconds until expiry, None once the entry is due
fn ttl_millis(entry: &SimilarityCacheEntry) -> Option<i64> {
    entry
        .remaining_ttl_at(Utc::now())
        .map(|ttl| ttl.as_millis().clamp(1, i64::MAX as u128) as i64)
}

#[async_trait]
impl SimilarityCache for RedisSimilarityCache {
    async fn get(&self, key: &QueryKey) -> Result<Option<SimilarityCacheEntry>, DomainError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.connection.clone();

        let (raw, accessed): (Option<String>, Option<String>) = redis::cmd("HMGET")
            .arg(&redis_key)
            .arg(ENTRY_FIELD)
            .arg(ACCESSED_FIELD)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache(format!("Failed to get key '{}': {}", redis_key, e))
            })?;

        let Some(raw) = raw else {
            return Ok(None);
        };

        let entry = with_access_time(Self::decode(key, &raw)?, accessed.as_deref());
        if entry.is_expired() {
            return Ok(None);
        }

        Ok(Some(entry))
    }

    async fn put(&self, entry: &SimilarityCacheEntry) -> Result<(), DomainError> {
        let Some(ttl_ms) = ttl_millis(entry) else {
            return Ok(());
        };

        let redis_key = self.redis_key(&entry.key);
        let fields = [
            (ENTRY_FIELD, Self::encode(entry)?),
            (ACCESSED_FIELD, access_stamp(entry.last_accessed_at)),
        ];
        let mut conn = self.connection.clone();

        let _: () = redis::pipe()
            .atomic()
            .del(&redis_key)
            .ignore()
            .hset_multiple(&redis_key, &fields)
            .ignore()
            .pexpire(&redis_key, ttl_ms)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Failed to set key '{}': {}", redis_key, e)))?;

        Ok(())
    }

    async fn touch(&self, entry: &SimilarityCacheEntry) -> Result<bool, DomainError> {
        if entry.is_expired() {
            return Ok(false);
        }

        let redis_key = self.redis_key(&entry.key);
        let mut conn = self.connection.clone();

        let updated: i32 = Script::new(TOUCH_SCRIPT)
            .key(&redis_key)
            .arg(ACCESSED_FIELD)
            .arg(access_stamp(entry.last_accessed_at))
            .invoke_async(&mut conn)
            .await
            .map_err(|e| {
                DomainError::cache(format!("Failed to touch key '{}': {}", redis_key, e))
            })?;

        Ok(updated == 1)
    }

    async fn remove(&self, key: &QueryKey) -> Result<bool, DomainError> {
        let redis_key = self.redis_key(key);
        let mut conn = self.connection.clone();

        let deleted: i32 = conn.del(&redis_key).await.map_err(|e| {
            DomainError::cache(format!("Failed to delete key '{}': {}", redis_key, e))
        })?;

        Ok(deleted > 0)
    }

    async fn size(&self) -> Result<usize, DomainError> {
        let mut conn = self.connection.clone();
        let pattern = format!("{}:*", self.config.key_prefix);

        let mut cursor: u64 = 0;
        let mut count = 0;

        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .arg(cursor)
                .arg("MATCH")
                .arg(&pattern)
                .arg("COUNT")
                .arg(100)
                .query_async(&mut conn)
                .await
                .map_err(|e| DomainError::cache(format!("Failed to scan keys: {}", e)))?;

            count += keys.len();
            cursor = next_cursor;

            if cursor == 0 {
                break;
            }
        }

        Ok(count)
    }

    async fn health_check(&self) -> Result<(), DomainError> {
        let mut conn = self.connection.clone();

        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(|e| DomainError::cache(format!("Redis ping failed: {}", e)))?;

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
