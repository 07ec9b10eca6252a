//! Report repository trait

use std::fmt::Debug;

use async_trait::async_trait;

use super::entity::{Report, ReportId};
use crate::domain::DomainError;

/// Access to the document store holding reports
#[async_trait]
pub trait ReportRepository: Send + Sync + Debug {
    /// Retrieves a report by ID
    async fn get(&self, id: &ReportId) -> Result<Option<Report>, DomainError>;

    /// Bulk fetch by identifier set
    ///
    /// Results follow the order of `ids`; identifiers with no stored report
    /// are skipped.
    async fn get_many(&self, ids: &[ReportId]) -> Result<Vec<Report>, DomainError>;

    /// Lists all reports, newest first
    async fn list(&self) -> Result<Vec<Report>, DomainError>;

    /// Stores a new report, fails with a conflict if the ID is taken
    async fn create(&self, report: Report) -> Result<Report, DomainError>;

    /// Deletes a report, returns true if it existed
    async fn delete(&self, id: &ReportId) -> Result<bool, DomainError>;

    async fn count(&self) -> Result<usize, DomainError> {
        Ok(self.list().await?.len())
    }
}
