//! Similarity domain - query normalization, cache keys and the stores behind the check

mod cache;
mod entry;
mod key;
mod normalize;
mod search;

pub use cache::SimilarityCache;
pub use entry::SimilarityCacheEntry;
pub use key::QueryKey;
pub use normalize::{normalize, terms};
pub use search::{FuzzyOptions, SearchIndex, SearchQuery};

#[cfg(test)]
pub use cache::mock::MockSimilarityCache;
#[cfg(test)]
pub use search::mock::MockSearchIndex;
