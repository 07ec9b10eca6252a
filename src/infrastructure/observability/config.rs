//! Observability configuration

use serde::Deserialize;

use crate::domain::DomainError;

/// Routes served by the API router; the metrics endpoint may not shadow them
const RESERVED_PATHS: &[&str] = &["/health", "/ready", "/live", "/api"];

/// Main observability configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ObservabilityConfig {
    pub tracing: TracingConfig,
    pub metrics: MetricsConfig,
}

/// OpenTelemetry span export settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    pub enabled: bool,
    /// OTLP gRPC endpoint
    pub otlp_endpoint: String,
    pub service_name: String,
    /// Exported as the `deployment.environment` resource attribute when set
    pub environment: Option<String>,
    /// Fraction of traces kept, clamped to 0.0..=1.0
    pub sampling_ratio: f64,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            otlp_endpoint: "http://localhost:4317".to_string(),
            service_name: env!("CARGO_PKG_NAME").to_string(),
            environment: None,
            sampling_ratio: 1.0,
        }
    }
}

/// Prometheus exporter settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    pub enabled: bool,
    pub path: String,
    /// Histogram buckets (seconds) for similarity check and search latency
    pub similarity_buckets: Vec<f64>,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            path: "/metrics".to_string(),
            // Cache hits land in the low milliseconds, fuzzy misses in the tens
            similarity_buckets: vec![0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0],
        }
    }
}

impl MetricsConfig {
    /// The endpoint path, rejected when it would collide with an API route
    pub fn route_path(&self) -> Result<&str, DomainError> {
        let path = self.path.as_str();

        if !path.starts_with('/') || path.len() < 2 {
            return Err(DomainError::configuration(format!(
                "Metrics path must start with '/' and name a route: '{}'",
                path
            )));
        }

        let reserved = RESERVED_PATHS.iter().any(|reserved| {
            path == *reserved
                || path
                    .strip_prefix(reserved)
                    .is_some_and(|rest| rest.starts_with('/'))
        });

        if reserved {
            return Err(DomainError::configuration(format!(
                "Metrics path '{}' collides with an API route",
                path
            )));
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_observability_config() {
        let config = ObservabilityConfig::default();

        assert!(!config.tracing.enabled);
        assert_eq!(config.tracing.service_name, "report-review");
        assert!(config.tracing.environment.is_none());

        assert!(config.metrics.enabled);
        assert_eq!(config.metrics.route_path().unwrap(), "/metrics");
        assert!(config
            .metrics
            .similarity_buckets
            .windows(2)
            .all(|pair| pair[0] < pair[1]));
    }

    #[test]
    fn test_partial_deserialize_uses_defaults() {
        let config: ObservabilityConfig = serde_json::from_str(
            r#"{"tracing": {"enabled": true, "environment": "staging"}, "metrics": {"path": "/internal/metrics"}}"#,
        )
        .unwrap();

        assert!(config.tracing.enabled);
        assert_eq!(config.tracing.environment.as_deref(), Some("staging"));
        assert_eq!(config.tracing.service_name, "report-review");
        assert_eq!(config.metrics.route_path().unwrap(), "/internal/metrics");
        assert_eq!(config.metrics.similarity_buckets.len(), 10);
    }

    #[test]
    fn test_metrics_path_cannot_shadow_api_routes() {
        for path in ["/health", "/api", "/api/check-similar-report", "metrics", "/"] {
            let config = MetricsConfig {
                path: path.to_string(),
                ..Default::default()
            };
            assert!(config.route_path().is_err(), "{} accepted", path);
        }

        let config = MetricsConfig {
            path: "/apix/metrics".to_string(),
            ..Default::default()
        };
        assert!(config.route_path().is_ok());
    }
}
