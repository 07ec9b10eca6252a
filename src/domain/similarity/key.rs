//! Cache key derivation for similarity queries

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::normalize::normalize;

/// SHA-256 hex digest of a normalized query
///
/// Used only as a lookup key; it carries no security meaning.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryKey(String);

impl QueryKey {
    /// Derive the key from text that is already normalized
    pub fn from_normalized(normalized: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(normalized.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    /// Normalize raw query text and derive its key
    pub fn for_query(raw: &str) -> Self {
        Self::from_normalized(&normalize(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Key with a namespace prefix, for shared key-value stores
    pub fn namespaced(&self, namespace: &str) -> String {
        format!("{}:{}", namespace, self.0)
    }
}

impl std::fmt::Display for QueryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
