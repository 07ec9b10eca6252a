//! Similar-report check with a query-keyed result cache

use std::fmt::Debug;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, warn};

use crate::domain::report::{Report, ReportRepository};
use crate::domain::similarity::{
    normalize, FuzzyOptions, QueryKey, SearchIndex, SearchQuery, SimilarityCache,
    SimilarityCacheEntry,
};
use crate::domain::DomainError;
use crate::infrastructure::observability::{record_search, record_similarity_check};

/// Configuration for similarity checks
#[derive(Debug, Clone)]
pub struct SimilarityServiceConfig {
    /// How long a cached candidate list stays valid
    pub ttl: Duration,
    /// Upper bound on candidates returned by the search backend
    pub max_candidates: usize,
    pub fuzzy: FuzzyOptions,
}

impl Default for SimilarityServiceConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_candidates: 5,
            fuzzy: FuzzyOptions::default(),
        }
    }
}

impl SimilarityServiceConfig {
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: FuzzyOptions) -> Self {
        self.fuzzy = fuzzy;
        self
    }
}

/// Where the candidates of a check came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckOutcome {
    Hit,
    Miss,
}

impl CheckOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hit => "hit",
            Self::Miss => "miss",
        }
    }
}

/// Result of a similarity check
#[derive(Debug, Clone)]
pub struct SimilarityCheck {
    pub exists: bool,
    pub reports: Vec<Report>,
    pub key: QueryKey,
    pub outcome: CheckOutcome,
}

impl SimilarityCheck {
    fn new(key: QueryKey, reports: Vec<Report>, outcome: CheckOutcome) -> Self {
        Self {
            exists: !reports.is_empty(),
            reports,
            key,
            outcome,
        }
    }
}

/// Trait for the similarity check used by the HTTP and CLI surfaces
#[async_trait]
pub trait SimilarityServiceTrait: Send + Sync + Debug {
    /// Checks whether reports similar to the free-text query already exist
    async fn check(&self, query: &str) -> Result<SimilarityCheck, DomainError>;
}

/// Similarity check backed by a cache, a report store and a search index
#[derive(Debug)]
pub struct SimilarityService {
    cache: Arc<dyn SimilarityCache>,
    repository: Arc<dyn ReportRepository>,
    search: Arc<dyn SearchIndex>,
    config: SimilarityServiceConfig,
}

impl SimilarityService {
    pub fn new(
        cache: Arc<dyn SimilarityCache>,
        repository: Arc<dyn ReportRepository>,
        search: Arc<dyn SearchIndex>,
    ) -> Self {
        Self::with_config(cache, repository, search, SimilarityServiceConfig::default())
    }

    pub fn with_config(
        cache: Arc<dyn SimilarityCache>,
        repository: Arc<dyn ReportRepository>,
        search: Arc<dyn SearchIndex>,
        config: SimilarityServiceConfig,
    ) -> Self {
        Self {
            cache,
            repository,
            search,
            config,
        }
    }

    pub fn config(&self) -> &SimilarityServiceConfig {
        &self.config
    }

    async fn run(&self, query: &str) -> Result<SimilarityCheck, DomainError> {
        if query.trim().is_empty() {
            return Err(DomainError::validation("Missing or invalid query"));
        }

        let normalized = normalize(query);
        if normalized.is_empty() {
            return Err(DomainError::validation(
                "Query must contain at least one letter or digit",
            ));
        }

        let key = QueryKey::from_normalized(&normalized);

        if let Some(entry) = self.cache.get(&key).await? {
            debug!(key = %key, candidates = entry.candidate_ids.len(), "Similarity cache hit");

            let reports = self.repository.get_many(&entry.candidate_ids).await?;
            self.touch_in_background(entry);

            return Ok(SimilarityCheck::new(key, reports, CheckOutcome::Hit));
        }

        debug!(key = %key, "Similarity cache miss");

        let reports = self.search_candidates(&normalized).await?;
        let candidate_ids = reports.iter().map(|report| report.id.clone()).collect();
        let entry =
            SimilarityCacheEntry::new(key.clone(), candidate_ids, Utc::now(), self.config.ttl);

        self.cache.put(&entry).await?;

        Ok(SimilarityCheck::new(key, reports, CheckOutcome::Miss))
    }

    async fn search_candidates(&self, normalized: &str) -> Result<Vec<Report>, DomainError> {
        let query = SearchQuery::new(normalized, self.config.max_candidates)
            .with_fuzzy(self.config.fuzzy);

        let start = Instant::now();
        let result = self.search.search(&query).await;

        record_search(
            self.search.backend(),
            result.is_ok(),
            result.as_ref().map(Vec::len).unwrap_or(0),
            start.elapsed(),
        );

        result
    }

    /// Refreshes `last_accessed_at` without holding up the response
    fn touch_in_background(&self, entry: SimilarityCacheEntry) {
        let cache = self.cache.clone();
        let touched = entry.touched(Utc::now());

        tokio::spawn(async move {
            if let Err(e) = cache.touch(&touched).await {
                warn!(key = %touched.key, error = %e, "Failed to refresh cache entry access time");
            }
        });
    }
}

#[async_trait]
impl SimilarityServiceTrait for SimilarityService {
    async fn check(&self, query: &str) -> Result<SimilarityCheck, DomainError> {
        let start = Instant::now();
        let result = self.run(query).await;

        match &result {
            Ok(check) => record_similarity_check(check.outcome.as_str(), start.elapsed()),
            Err(e) if e.is_client_error() => {}
            Err(_) => record_similarity_check("error", start.elapsed()),
        }

        result
    }
}
