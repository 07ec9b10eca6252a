//! Full-text / fuzzy search index trait

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::report::Report;
use crate::domain::DomainError;

/// Edit-distance tolerance for title matching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FuzzyOptions {
    /// Maximum single-character edits between a query term and a title word
    pub max_edits: usize,
    /// Leading characters that must match exactly
    pub prefix_length: usize,
}

impl Default for FuzzyOptions {
    fn default() -> Self {
        Self {
            max_edits: 2,
            prefix_length: 1,
        }
    }
}

/// A bounded search over report titles and tags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    /// Normalized query text
    pub text: String,
    /// Maximum number of reports returned
    pub limit: usize,
    pub fuzzy: FuzzyOptions,
}

impl SearchQuery {
    pub fn new(text: impl Into<String>, limit: usize) -> Self {
        Self {
            text: text.into(),
            limit,
            fuzzy: FuzzyOptions::default(),
        }
    }

    pub fn with_fuzzy(mut self, fuzzy: FuzzyOptions) -> Self {
        self.fuzzy = fuzzy;
        self
    }
}

/// External search over the document store
#[async_trait]
pub trait SearchIndex: Send + Sync + Debug {
    /// Returns at most `query.limit` reports, best match first
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Report>, DomainError>;

    /// Backend name for logs and health checks
    fn backend(&self) -> &'static str;
}
