//! Health check endpoints for Kubernetes

use std::time::Instant;

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use tracing::warn;

use super::state::AppState;
use crate::api::types::Json;
use crate::domain::DomainError;

/// Detailed health response with component status
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<Vec<HealthCheck>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Health check status
#[derive(Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Individual component health check
#[derive(Serialize)]
pub struct HealthCheck {
    pub name: String,
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
}

/// Simple health check - returns 200 if the service is running
/// Used for basic liveness checks
pub async fn health_check() -> impl IntoResponse {
    let response = HealthResponse {
        status: HealthStatus::Healthy,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: None,
        latency_ms: None,
    };

    (StatusCode::OK, Json(response))
}

/// Readiness check with dependency verification
/// Checks if the service can handle requests
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    let start = Instant::now();

    let checks = vec![
        check_report_store(&state).await,
        check_similarity_cache(&state).await,
    ];

    let overall_status = overall_status(&checks);
    let response = HealthResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        checks: Some(checks),
        latency_ms: Some(start.elapsed().as_millis() as u64),
    };

    let status_code = match overall_status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(response))
}

/// Liveness check - simple check to verify the service is running
/// Used by Kubernetes liveness checks to detect crashes
pub async fn live_check() -> impl IntoResponse {
    StatusCode::OK
}

/// Report store failures make the service unhealthy; any other failure degrades it
fn overall_status(checks: &[HealthCheck]) -> HealthStatus {
    let mut status = HealthStatus::Healthy;

    for check in checks.iter().filter(|c| c.status != HealthStatus::Healthy) {
        if check.name == REPORT_STORE {
            return HealthStatus::Unhealthy;
        }
        status = HealthStatus::Degraded;
    }

    status
}

const REPORT_STORE: &str = "report_store";
const SIMILARITY_CACHE: &str = "similarity_cache";

async fn check_report_store(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.report_repository.count().await.map(|_| ());
    component_check(REPORT_STORE, result, start)
}

async fn check_similarity_cache(state: &AppState) -> HealthCheck {
    let start = Instant::now();
    let result = state.cache.health_check().await;
    component_check(SIMILARITY_CACHE, result, start)
}

fn component_check(
    name: &str,
    result: Result<(), DomainError>,
    start: Instant,
) -> HealthCheck {
    let latency_ms = Some(start.elapsed().as_millis() as u64);

    match result {
        Ok(_) => HealthCheck {
            name: name.to_string(),
            status: HealthStatus::Healthy,
            message: None,
            latency_ms,
        },
        Err(e) => {
            warn!(component = name, error = %e, "Readiness check failed");
            HealthCheck {
                name: name.to_string(),
                status: HealthStatus::Unhealthy,
                message: Some(e.to_string()),
                latency_ms,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_serialization() {
        assert_eq!(
            serde_json::to_string(&HealthStatus::Healthy).unwrap(),
            "\"healthy\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Degraded).unwrap(),
            "\"degraded\""
        );
        assert_eq!(
            serde_json::to_string(&HealthStatus::Unhealthy).unwrap(),
            "\"unhealthy\""
        );
    }

    #[test]
    fn test_health_response_serialization() {
        let response = HealthResponse {
            status: HealthStatus::Healthy,
            version: "1.0.0".to_string(),
            checks: None,
            latency_ms: None,
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"healthy\""));
        assert!(json.contains("\"version\":\"1.0.0\""));
        assert!(!json.contains("checks"));
    }

    #[test]
    fn test_health_response_with_checks() {
        let response = HealthResponse {
            status: HealthStatus::Degraded,
            version: "1.0.0".to_string(),
            checks: Some(vec![
                HealthCheck {
                    name: "report_store".to_string(),
                    status: HealthStatus::Healthy,
                    message: None,
                    latency_ms: Some(5),
                },
                HealthCheck {
                    name: "similarity_cache".to_string(),
                    status: HealthStatus::Unhealthy,
                    message: Some("Connection refused".to_string()),
                    latency_ms: Some(100),
                },
            ]),
            latency_ms: Some(105),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(json.contains("\"status\":\"degraded\""));
        assert!(json.contains("\"report_store\""));
        assert!(json.contains("\"similarity_cache\""));
        assert!(json.contains("\"Connection refused\""));
    }

    fn check(name: &str, status: HealthStatus) -> HealthCheck {
        HealthCheck {
            name: name.to_string(),
            status,
            message: None,
            latency_ms: None,
        }
    }

    #[test]
    fn test_overall_status() {
        let healthy = [
            check(REPORT_STORE, HealthStatus::Healthy),
            check(SIMILARITY_CACHE, HealthStatus::Healthy),
        ];
        assert!(overall_status(&healthy) == HealthStatus::Healthy);

        let cache_down = [
            check(REPORT_STORE, HealthStatus::Healthy),
            check(SIMILARITY_CACHE, HealthStatus::Unhealthy),
        ];
        assert!(overall_status(&cache_down) == HealthStatus::Degraded);

        let store_down = [
            check(REPORT_STORE, HealthStatus::Unhealthy),
            check(SIMILARITY_CACHE, HealthStatus::Healthy),
        ];
        assert!(overall_status(&store_down) == HealthStatus::Unhealthy);
    }

    #[tokio::test]
    async fn test_ready_check_with_failing_store() {
        use std::sync::Arc;

        use crate::domain::report::MockReportRepository;
        use crate::domain::similarity::MockSimilarityCache;
        use crate::infrastructure::services::MockSimilarityService;

        let state = AppState::new(
            Arc::new(MockSimilarityService::new()),
            Arc::new(MockReportRepository::new().with_error("connection refused")),
            Arc::new(MockSimilarityCache::new()),
        );

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_ready_check_with_failing_cache() {
        use std::sync::Arc;

        use crate::domain::report::MockReportRepository;
        use crate::domain::similarity::MockSimilarityCache;
        use crate::infrastructure::services::MockSimilarityService;

        let state = AppState::new(
            Arc::new(MockSimilarityService::new()),
            Arc::new(MockReportRepository::new()),
            Arc::new(MockSimilarityCache::new().with_error("redis timeout")),
        );

        let response = ready_check(State(state)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
