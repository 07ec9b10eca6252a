//! Cached similarity result

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::key::QueryKey;
use crate::domain::report::ReportId;

/// Candidate identifiers remembered for one normalized query
///
/// Holds identifiers only; report content is always re-read from the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityCacheEntry {
    pub key: QueryKey,
    pub candidate_ids: Vec<ReportId>,
    pub created_at: DateTime<Utc>,
    pub last_accessed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SimilarityCacheEntry {
    /// Create an entry that expires `ttl` after `now`
    pub fn new(key: QueryKey, candidate_ids: Vec<ReportId>, now: DateTime<Utc>, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        let expires_at = now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            key,
            candidate_ids,
            created_at: now,
            last_accessed_at: now,
            expires_at,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// Time left before expiry, None once expired
    pub fn remaining_ttl_at(&self, now: DateTime<Utc>) -> Option<Duration> {
        if self.is_expired_at(now) {
            return None;
        }

        (self.expires_at - now).to_std().ok()
    }

    /// Copy with a new access time; expiry is untouched
    pub fn touched(&self, now: DateTime<Utc>) -> Self {
        Self {
            last_accessed_at: now,
            ..self.clone()
        }
    }
}
