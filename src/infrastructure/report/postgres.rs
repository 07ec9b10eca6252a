//! PostgreSQL report store with trigram search

use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::Row;

use crate::domain::report::{Report, ReportId, ReportRepository};
use crate::domain::similarity::{normalize, terms, SearchIndex, SearchQuery};
use crate::domain::DomainError;

/// PostgreSQL connection configuration
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    /// Database connection URL
    pub url: String,
    /// Maximum number of connections in the pool
    pub max_connections: u32,
    /// Minimum number of connections to maintain
    pub min_connections: u32,
    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Table holding the reports
    pub table_name: String,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            url: "postgres://localhost/report_review".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            table_name: "reports".to_string(),
        }
    }
}

impl PostgresConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn with_max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn with_table_name(mut self, table_name: impl Into<String>) -> Self {
        self.table_name = table_name.into();
        self
    }
}

/// Report store backed by PostgreSQL
///
/// Each report is kept as JSONB next to a normalized title and tag-word
/// array, which the trigram search runs against.
pub struct PostgresReportStore {
    pool: PgPool,
    table_name: String,
}

impl Debug for PostgresReportStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostgresReportStore")
            .field("table_name", &self.table_name)
            .finish()
    }
}

impl PostgresReportStore {
    pub fn new(pool: PgPool, table_name: impl Into<String>) -> Self {
        Self {
            pool,
            table_name: table_name.into(),
        }
    }

    /// Connects with a pooled connection and makes sure the schema exists
    pub async fn connect(config: &PostgresConfig) -> Result<Self, DomainError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect(&config.url)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to connect to PostgreSQL: {}", e)))?;

        let store = Self::new(pool, config.table_name.clone());
        store.ensure_table().await?;
        Ok(store)
    }

    /// Creates the trigram extension, the table and its search indexes
    pub async fn ensure_table(&self) -> Result<(), DomainError> {
        let statements = [
            "CREATE EXTENSION IF NOT EXISTS pg_trgm".to_string(),
            format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id VARCHAR(64) PRIMARY KEY,
                    search_title TEXT NOT NULL,
                    search_tags TEXT[] NOT NULL DEFAULT '{{}}',
                    data JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                )
                "#,
                table = self.table_name
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {table}_title_trgm_idx ON {table} USING GIN (search_title gin_trgm_ops)",
                table = self.table_name
            ),
            format!(
                "CREATE INDEX IF NOT EXISTS {table}_tags_idx ON {table} USING GIN (search_tags)",
                table = self.table_name
            ),
        ];

        for statement in &statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| DomainError::storage(format!("Failed to prepare schema: {}", e)))?;
        }

        Ok(())
    }

    fn decode(row: &PgRow) -> Result<Report, DomainError> {
        let data: serde_json::Value = row.get("data");
        serde_json::from_value(data)
            .map_err(|e| DomainError::storage(format!("Failed to deserialize report: {}", e)))
    }
}

/// Normalized words of every tag, deduplicated
fn tag_words(tags: &[String]) -> Vec<String> {
    let mut words: Vec<String> = tags
        .iter()
        .flat_map(|tag| {
            let normalized = normalize(tag);
            terms(&normalized).map(str::to_string).collect::<Vec<_>>()
        })
        .collect();

    words.sort();
    words.dedup();
    words
}

#[async_trait]
impl ReportRepository for PostgresReportStore {
    async fn get(&self, id: &ReportId) -> Result<Option<Report>, DomainError> {
        let query = format!("SELECT data FROM {} WHERE id = $1", self.table_name);

        let row = sqlx::query(&query)
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to get report: {}", e)))?;

        row.as_ref().map(Self::decode).transpose()
    }

    async fn get_many(&self, ids: &[ReportId]) -> Result<Vec<Report>, DomainError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let query = format!("SELECT data FROM {} WHERE id = ANY($1)", self.table_name);
        let keys: Vec<String> = ids.iter().map(|id| id.as_str().to_string()).collect();

        let rows = sqlx::query(&query)
            .bind(&keys)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to fetch reports: {}", e)))?;

        let mut found: HashMap<ReportId, Report> = HashMap::with_capacity(rows.len());
        for row in &rows {
            let report = Self::decode(row)?;
            found.insert(report.id.clone(), report);
        }

        Ok(ids.iter().filter_map(|id| found.get(id).cloned()).collect())
    }

    async fn list(&self) -> Result<Vec<Report>, DomainError> {
        let query = format!(
            "SELECT data FROM {} ORDER BY created_at DESC",
            self.table_name
        );

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to list reports: {}", e)))?;

        rows.iter().map(Self::decode).collect()
    }

    async fn create(&self, report: Report) -> Result<Report, DomainError> {
        let data = serde_json::to_value(&report)
            .map_err(|e| DomainError::storage(format!("Failed to serialize report: {}", e)))?;

        let query = format!(
            r#"
            INSERT INTO {} (id, search_title, search_tags, data, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO NOTHING
            "#,
            self.table_name
        );

        let result = sqlx::query(&query)
            .bind(report.id.as_str())
            .bind(normalize(&report.title))
            .bind(tag_words(&report.tags))
            .bind(&data)
            .bind(report.created_at)
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to create report: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::conflict(format!(
                "Report '{}' already exists",
                report.id
            )));
        }

        Ok(report)
    }

    async fn delete(&self, id: &ReportId) -> Result<bool, DomainError> {
        let query = format!("DELETE FROM {} WHERE id = $1", self.table_name);

        let result = sqlx::query(&query)
            .bind(id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to delete report: {}", e)))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<usize, DomainError> {
        let query = format!("SELECT COUNT(*) as count FROM {}", self.table_name);

        let row = sqlx::query(&query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::storage(format!("Failed to count reports: {}", e)))?;

        let count: i64 = row.get("count");
        Ok(count as usize)
    }
}

#[async_trait]
impl SearchIndex for PostgresReportStore {
    async fn search(&self, query: &SearchQuery) -> Result<Vec<Report>, DomainError> {
        let query_terms: Vec<String> = terms(&query.text).map(str::to_string).collect();
        if query_terms.is_empty() || query.limit == 0 {
            return Ok(Vec::new());
        }

        let sql = format!(
            r#"
            SELECT data FROM {}
            WHERE search_title % $1 OR search_tags && $2
            ORDER BY
                similarity(search_title, $1)
                    + CASE WHEN search_tags && $2 THEN 1.0 ELSE 0.0 END DESC,
                created_at DESC
            LIMIT $3
            "#,
            self.table_name
        );

        let rows = sqlx::query(&sql)
            .bind(&query.text)
            .bind(&query_terms)
            .bind(query.limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| DomainError::search(format!("Trigram search failed: {}", e)))?;

        rows.iter().map(Self::decode).collect()
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_config_default() {
        let config = PostgresConfig::default();

        assert_eq!(config.max_connections, 10);
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.table_name, "reports");
    }

    #[test]
    fn test_postgres_config_builder() {
        let config = PostgresConfig::new("postgres://db/reports")
            .with_max_connections(4)
            .with_table_name("report_docs");

        assert_eq!(config.url, "postgres://db/reports");
        assert_eq!(config.max_connections, 4);
        assert_eq!(config.table_name, "report_docs");
    }

    #[test]
    fn test_tag_words() {
        let tags = vec![
            "Plastic-Free".to_string(),
            "eco".to_string(),
            "ECO friendly".to_string(),
        ];

        assert_eq!(tag_words(&tags), vec!["eco", "free", "friendly", "plastic"]);
    }
}
