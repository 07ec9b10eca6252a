//! In-memory report store for development and testing

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::fuzzy;
use crate::domain::report::{Report, ReportId, ReportRepository};
use crate::domain::similarity::{SearchIndex, SearchQuery};
use crate::domain::DomainError;

/// In-memory report store, also serving fuzzy title/tag search
#[derive(Debug, Default, Clone)]
pub struct InMemoryReportStore {
    reports: Arc<RwLock<HashMap<ReportId, Report>>>,
}

impl InMemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-filled with the given reports, later duplicates win
    pub fn with_reports(reports: impl IntoIterator<Item = Report>) -> Self {
        let reports = reports
            .into_iter()
            .map(|report| (report.id.clone(), report))
            .collect();

        Self {
            reports: Arc::new(RwLock::new(reports)),
        }
    }
}

#[async_trait]
impl ReportRepository for InMemoryReportStore {
    async fn get(&self, id: &ReportId) -> Result<Option<Report>, DomainError> {
        let reports = self.reports.read().await;
        Ok(reports.get(id).cloned())
    }

    async fn get_many(&self, ids: &[ReportId]) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.read().await;
        Ok(ids.iter().filter_map(|id| reports.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.read().await;
        let mut list: Vec<Report> = reports.values().cloned().collect();
        list.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(list)
    }

    async fn create(&self, report: Report) -> Result<Report, DomainError> {
        let mut reports = self.reports.write().await;

        if reports.contains_key(&report.id) {
            return Err(DomainError::conflict(format!(
                "Report '{}' already exists",
                report.id
            )));
        }

        reports.insert(report.id.clone(), report.clone());
        Ok(report)
    }

    async fn delete(&self, id: &ReportId) -> Result<bool, DomainError> {
        let mut reports = self.reports.write().await;
        Ok(reports.remove(id).is_some())
    }

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.reports.read().await.len())
    }
}

#[async_trait]
impl SearchIndex for InMemoryReportStore {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Report>, DomainError> {
        let reports = self.reports.read().await;
        Ok(fuzzy::rank(
            reports.values(),
            &query.text,
            query.limit,
            &query.fuzzy,
        ))
    }

    fn backend(&self) -> &'static str {
        "in_memory"
    }
}
