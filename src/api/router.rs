use axum::{
    extract::DefaultBodyLimit,
    http::Uri,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::health;
use super::middleware::{
    logging_middleware, metrics_middleware, route_access_middleware,
    security_headers_middleware, MAX_BODY_SIZE,
};
use super::similarity;
use super::state::AppState;
use super::types::ApiError;

/// Create the full router with application state
pub fn create_router_with_state(state: AppState) -> Router {
    // Health routes bypass route access so orchestrators need no role header
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/live", get(health::live_check));

    let api = Router::new()
        .route(
            "/api/check-similar-report",
            post(similarity::check_similar_report),
        )
        .fallback(route_not_found)
        .layer(middleware::from_fn(route_access_middleware));

    health_routes
        .merge(api)
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_SIZE))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
}

async fn route_not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    use super::*;
    use crate::api::middleware::ROLE_HEADER;
    use crate::api::state::mock::state_with_service;
    use crate::infrastructure::services::MockSimilarityService;

    fn app() -> Router {
        create_router_with_state(state_with_service(Arc::new(MockSimilarityService::new())))
    }

    fn get_request(path: &str, role: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(path);
        if let Some(role) = role {
            builder = builder.header(ROLE_HEADER, role);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_health_routes_need_no_role() {
        for path in ["/health", "/ready", "/live"] {
            let response = app().oneshot(get_request(path, None)).await.unwrap();
            assert_eq!(response.status(), StatusCode::OK, "{}", path);
        }
    }

    #[tokio::test]
    async fn test_check_endpoint_is_public() {
        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/check-similar-report")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"query": "glass jar"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_routes_go_through_access_check() {
        let response = app()
            .oneshot(get_request("/admin/reports", None))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let response = app()
            .oneshot(get_request("/admin/reports", Some("labtester")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app()
            .oneshot(get_request("/admin/reports", Some("admin")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_request_id_is_set_and_propagated() {
        let response = app().oneshot(get_request("/live", None)).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));

        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/live")
                    .header("x-request-id", "req-7")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.headers()["x-request-id"], "req-7");
    }

    #[tokio::test]
    async fn test_security_headers_on_every_response() {
        let response = app().oneshot(get_request("/health", None)).await.unwrap();
        assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    }

    #[tokio::test]
    async fn test_oversized_body_is_rejected() {
        let body = format!(r#"{{"query": "{}"}}"#, "a".repeat(MAX_BODY_SIZE + 1));

        let response = app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/check-similar-report")
                    .header("content-type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }
}
