//! Report store factory for runtime backend selection

use std::sync::Arc;

use crate::domain::report::ReportRepository;
use crate::domain::similarity::SearchIndex;
use crate::domain::DomainError;

use super::in_memory::InMemoryReportStore;
use super::postgres::{PostgresConfig, PostgresReportStore};

/// Supported report store types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageType {
    /// In-memory store (for testing/development)
    #[default]
    InMemory,
    /// PostgreSQL store
    Postgres,
}

impl std::fmt::Display for StorageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InMemory => write!(f, "in_memory"),
            Self::Postgres => write!(f, "postgres"),
        }
    }
}

impl std::str::FromStr for StorageType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "inmemory" | "in-memory" | "in_memory" => Ok(Self::InMemory),
            "postgres" | "postgresql" | "pg" => Ok(Self::Postgres),
            _ => Err(DomainError::configuration(format!(
                "Unknown storage type: {}. Valid types: in_memory, postgres",
                s
            ))),
        }
    }
}

/// Report store configuration
#[derive(Debug, Clone)]
pub enum StorageConfig {
    InMemory,
    Postgres(PostgresConfig),
}

impl StorageConfig {
    pub fn in_memory() -> Self {
        Self::InMemory
    }

    /// Creates a PostgreSQL configuration from a URL
    pub fn postgres_url(url: impl Into<String>) -> Self {
        Self::Postgres(PostgresConfig::new(url))
    }

    pub fn storage_type(&self) -> StorageType {
        match self {
            Self::InMemory => StorageType::InMemory,
            Self::Postgres(_) => StorageType::Postgres,
        }
    }
}

/// One backend seen through both of its roles
#[derive(Debug, Clone)]
pub struct ReportBackends {
    pub repository: Arc<dyn ReportRepository>,
    pub search: Arc<dyn SearchIndex>,
}

impl ReportBackends {
    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: ReportRepository + SearchIndex + 'static,
    {
        Self {
            repository: store.clone(),
            search: store,
        }
    }
}

/// Factory for creating report stores
#[derive(Debug)]
pub struct StorageFactory;

impl StorageFactory {
    pub async fn create(config: &StorageConfig) -> Result<ReportBackends, DomainError> {
        match config {
            StorageConfig::InMemory => Ok(Self::create_in_memory()),
            StorageConfig::Postgres(pg_config) => {
                let store = PostgresReportStore::connect(pg_config).await?;
                Ok(ReportBackends::from_store(Arc::new(store)))
            }
        }
    }

    pub fn create_in_memory() -> ReportBackends {
        ReportBackends::from_store(Arc::new(InMemoryReportStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::report::{FileAttachment, Report, ReportId};
    use crate::domain::similarity::SearchQuery;

    #[test]
    fn test_storage_type_from_str() {
        assert_eq!("memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("in_memory".parse::<StorageType>().unwrap(), StorageType::InMemory);
        assert_eq!("postgresql".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert_eq!("pg".parse::<StorageType>().unwrap(), StorageType::Postgres);
        assert!("mongo".parse::<StorageType>().is_err());
    }

    #[test]
    fn test_storage_config_types() {
        assert_eq!(StorageConfig::in_memory().storage_type(), StorageType::InMemory);
        assert_eq!(
            StorageConfig::postgres_url("postgres://localhost/test").storage_type(),
            StorageType::Postgres
        );
    }

    #[tokio::test]
    async fn test_in_memory_backends_share_state() {
        let backends = StorageFactory::create(&StorageConfig::in_memory())
            .await
            .unwrap();

        let report = Report::new(
            ReportId::new("r-1").unwrap(),
            "Glass Jar",
            "sales@example.com",
            FileAttachment::new("https://files.example.com/jar.pdf", "pdf", 10, "f-1"),
        );
        backends.repository.create(report).await.unwrap();

        let found = backends
            .search
            .search(&SearchQuery::new("glass jar", 5))
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(backends.search.backend(), "in_memory");
    }
}
