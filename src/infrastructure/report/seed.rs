//! Loads reports from a JSON file into a report repository

use std::path::Path;

use tracing::{debug, info};

use crate::domain::report::{Report, ReportRepository};
use crate::domain::DomainError;

/// Outcome of a seed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub inserted: usize,
    pub skipped: usize,
}

/// Parses a JSON array of reports
pub fn parse_reports(json: &str) -> Result<Vec<Report>, DomainError> {
    serde_json::from_str(json)
        .map_err(|e| DomainError::validation(format!("Invalid report seed data: {}", e)))
}

/// Inserts every report, skipping identifiers that already exist
pub async fn seed_reports(
    repository: &dyn ReportRepository,
    reports: Vec<Report>,
) -> Result<SeedSummary, DomainError> {
    let mut summary = SeedSummary::default();

    for report in reports {
        let id = report.id.clone();

        match repository.create(report).await {
            Ok(_) => summary.inserted += 1,
            Err(DomainError::Conflict { .. }) => {
                debug!(report_id = %id, "Seed report already present, skipping");
                summary.skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    Ok(summary)
}

/// Reads a seed file and loads it into the repository
pub async fn seed_from_file(
    repository: &dyn ReportRepository,
    path: impl AsRef<Path>,
) -> Result<SeedSummary, DomainError> {
    let path = path.as_ref();
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        DomainError::configuration(format!(
            "Failed to read seed file '{}': {}",
            path.display(),
            e
        ))
    })?;

    let summary = seed_reports(repository, parse_reports(&json)?).await?;

    info!(
        path = %path.display(),
        inserted = summary.inserted,
        skipped = summary.skipped,
        "Seeded report store"
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::report::InMemoryReportStore;

    const SEED: &str = r#"[
        {
            "id": "r-1",
            "title": "Glass Jar",
            "uploadedBy": "sales@example.com",
            "fileUrl": "https://files.example.com/jar.pdf",
            "fileType": "pdf",
            "fileSize": 2048,
            "storageFileId": "file-jar",
            "tags": ["kitchen"],
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        },
        {
            "id": "r-2",
            "title": "Bamboo Toothbrush",
            "uploadedBy": "sales@example.com",
            "fileUrl": "https://files.example.com/brush.pdf",
            "fileType": "pdf",
            "fileSize": 4096,
            "storageFileId": "file-brush",
            "status": "approved",
            "createdAt": "2024-03-02T10:00:00Z",
            "updatedAt": "2024-03-05T10:00:00Z"
        }
    ]"#;

    #[test]
    fn test_parse_reports() {
        let reports = parse_reports(SEED).unwrap();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].tags, vec!["kitchen"]);
        assert!(reports[1].status.is_final());
    }

    #[test]
    fn test_parse_reports_invalid() {
        let err = parse_reports(r#"[{"id": "bad id!"}]"#).unwrap_err();
        assert!(matches!(err, DomainError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_seed_skips_existing() {
        let store = InMemoryReportStore::new();

        let first = seed_reports(&store, parse_reports(SEED).unwrap())
            .await
            .unwrap();
        assert_eq!(first, SeedSummary { inserted: 2, skipped: 0 });

        let second = seed_reports(&store, parse_reports(SEED).unwrap())
            .await
            .unwrap();
        assert_eq!(second, SeedSummary { inserted: 0, skipped: 2 });
        assert_eq!(store.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_seed_from_missing_file() {
        let store = InMemoryReportStore::new();

        let err = seed_from_file(&store, "/nonexistent/reports.json")
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Configuration { .. }));
    }
}
