//! Cache infrastructure - Similarity cache implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{CacheConfig, CacheFactory, CacheType};
pub use in_memory::{InMemoryCacheConfig, InMemorySimilarityCache};
pub use redis::{RedisCacheConfig, RedisSimilarityCache};
