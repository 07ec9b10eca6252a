//! Application state for shared services

use std::sync::Arc;

use crate::domain::{ReportRepository, SimilarityCache};
use crate::infrastructure::services::SimilarityServiceTrait;

/// Application state containing shared services using dynamic dispatch
#[derive(Clone)]
pub struct AppState {
    pub similarity_service: Arc<dyn SimilarityServiceTrait>,
    pub report_repository: Arc<dyn ReportRepository>,
    pub cache: Arc<dyn SimilarityCache>,
}

impl AppState {
    pub fn new(
        similarity_service: Arc<dyn SimilarityServiceTrait>,
        report_repository: Arc<dyn ReportRepository>,
        cache: Arc<dyn SimilarityCache>,
    ) -> Self {
        Self {
            similarity_service,
            report_repository,
            cache,
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("cache_backend", &self.cache.backend())
            .finish_non_exhaustive()
    }
}
