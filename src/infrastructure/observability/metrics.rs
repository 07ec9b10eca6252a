//! Prometheus metrics infrastructure

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, response::IntoResponse, routing::get, Router};
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, Matcher, PrometheusBuilder, PrometheusHandle};

use super::config::MetricsConfig;

const SIMILARITY_LATENCY_METRICS: &[&str] = &[
    "similarity_check_duration_seconds",
    "similarity_search_duration_seconds",
];

/// Prometheus metrics handle for serving metrics endpoint
#[derive(Clone)]
pub struct PrometheusMetrics {
    handle: Arc<PrometheusHandle>,
}

impl PrometheusMetrics {
    /// Get the metrics as a string for the /metrics endpoint
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

/// Initialize Prometheus metrics
pub fn init_metrics(config: &MetricsConfig) -> Option<PrometheusMetrics> {
    if !config.enabled {
        tracing::info!("Prometheus metrics disabled");
        return None;
    }

    match builder(config).and_then(|b| b.install_recorder()) {
        Ok(handle) => {
            gauge!("report_review_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);

            tracing::info!("Prometheus metrics initialized at {}", config.path);

            Some(PrometheusMetrics {
                handle: Arc::new(handle),
            })
        }
        Err(e) => {
            tracing::error!("Failed to initialize Prometheus metrics: {}", e);
            None
        }
    }
}

/// Exporter with the configured latency buckets on the similarity histograms
fn builder(config: &MetricsConfig) -> Result<PrometheusBuilder, BuildError> {
    SIMILARITY_LATENCY_METRICS
        .iter()
        .try_fold(PrometheusBuilder::new(), |builder, name| {
            builder.set_buckets_for_metric(
                Matcher::Full((*name).to_string()),
                &config.similarity_buckets,
            )
        })
}

/// Create the metrics router
pub fn create_metrics_router(metrics: PrometheusMetrics, path: &str) -> Router {
    Router::new()
        .route(path, get(metrics_handler))
        .with_state(metrics)
}

async fn metrics_handler(State(metrics): State<PrometheusMetrics>) -> impl IntoResponse {
    metrics.render()
}

/// Record an HTTP request metric; `path` must be a route template or another bounded label
pub fn record_http_request(method: &str, path: &str, status: u16, duration: Duration) {
    let labels = [
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ];

    counter!("http_requests_total", &labels).increment(1);
    histogram!("http_request_duration_seconds", &labels).record(duration.as_secs_f64());

    if status >= 500 {
        counter!("http_server_errors_total", &labels).increment(1);
    }
}

/// Record the outcome of one similarity check ("hit", "miss" or "error")
pub fn record_similarity_check(outcome: &str, duration: Duration) {
    let labels = [("outcome", outcome.to_string())];

    counter!("similarity_checks_total", &labels).increment(1);
    histogram!("similarity_check_duration_seconds", &labels).record(duration.as_secs_f64());
}

/// Record a call to the search backend
pub fn record_search(backend: &str, success: bool, results: usize, duration: Duration) {
    let labels = [
        ("backend", backend.to_string()),
        ("status", if success { "success" } else { "error" }.to_string()),
    ];

    counter!("similarity_search_requests_total", &labels).increment(1);
    histogram!("similarity_search_duration_seconds", &labels).record(duration.as_secs_f64());
    histogram!("similarity_search_results", &labels).record(results as f64);
}
