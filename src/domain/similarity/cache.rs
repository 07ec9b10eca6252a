//! Similarity cache store trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entry::SimilarityCacheEntry;
use super::key::QueryKey;
use crate::domain::DomainError;

/// Key-value store for similarity results with per-entry expiry
///
/// Expiry is the store's job: `get` never returns an entry whose
/// `expires_at` has passed.
#[async_trait]
pub trait SimilarityCache: Send + Sync + Debug {
    /// Exact-match read by key
    async fn get(&self, key: &QueryKey) -> Result<Option<SimilarityCacheEntry>, DomainError>;

    /// Writes an entry, replacing any existing entry under the same key
    async fn put(&self, entry: &SimilarityCacheEntry) -> Result<(), DomainError>;

    /// Records a read without changing expiry, returns false if the entry is gone
    ///
    /// Only the stored access time moves, and only forward. The rest of
    /// `entry` is ignored so a late touch cannot undo a concurrent `put`.
    async fn touch(&self, entry: &SimilarityCacheEntry) -> Result<bool, DomainError>;

    /// Removes an entry, returns true if it existed
    async fn remove(&self, key: &QueryKey) -> Result<bool, DomainError>;

    /// Approximate number of live entries
    async fn size(&self) -> Result<usize, DomainError>;

    /// Cheap reachability check for readiness, backends with a remote
    /// connection should override this
    async fn health_check(&self) -> Result<(), DomainError> {
        self.size().await.map(|_| ())
    }

    /// Backend name for logs and health checks
    fn backend(&self) -> &'static str;
}
