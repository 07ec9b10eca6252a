//! HTTP metrics middleware for recording request/response metrics

use std::time::Instant;

use axum::{body::Body, http::Request, middleware::Next, response::Response};

use super::logging::route_template;
use crate::infrastructure::observability::record_http_request;

/// Path label shared by every request that matched no route
pub const UNMATCHED_ROUTE: &str = "unmatched";

/// Records count and latency per method, route and status
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = metric_path(&request);

    let response = next.run(request).await;

    record_http_request(
        method.as_str(),
        &path,
        response.status().as_u16(),
        start.elapsed(),
    );

    response
}

/// Route template as the path label; raw paths would give one series per URL
fn metric_path(request: &Request<Body>) -> String {
    route_template(request).unwrap_or_else(|| UNMATCHED_ROUTE.to_string())
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use axum::{middleware, routing::get, Router};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route("/reports/{id}", get(|| async { "ok" }))
            .layer(middleware::from_fn(metrics_middleware))
    }

    fn get_request(path: &str) -> Request<Body> {
        Request::builder().uri(path).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_passes_response_through() {
        let response = app().oneshot(get_request("/reports/42")).await.unwrap();

        assert_eq!(response.status(), axum::http::StatusCode::OK);
    }

    #[test]
    fn test_unmatched_request_label() {
        assert_eq!(metric_path(&get_request("/anything/at/all")), UNMATCHED_ROUTE);
    }

    #[test]
    fn test_path_label_cardinality_is_bounded() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();

        metrics::with_local_recorder(&recorder, || {
            runtime.block_on(async {
                for i in 0..20 {
                    app().oneshot(get_request(&format!("/x{}abc", i))).await.unwrap();
                    app().oneshot(get_request(&format!("/reports/{}", i))).await.unwrap();
                }
            })
        });

        let series: HashSet<String> = handle
            .render()
            .lines()
            .filter(|line| line.starts_with("http_requests_total{"))
            .map(|line| line.split_whitespace().next().unwrap_or_default().to_string())
            .collect();

        assert_eq!(series.len(), 2, "{:?}", series);
        assert!(series.iter().any(|s| s.contains("path=\"unmatched\"")));
        assert!(series.iter().any(|s| s.contains("path=\"/reports/{id}\"")));
    }
}
