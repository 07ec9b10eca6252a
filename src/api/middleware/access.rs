//! Route access middleware driven by the role table

use axum::{
    body::Body,
    http::{HeaderMap, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::api::types::ApiError;
use crate::domain::access::{can_access_route, is_public_path};
use crate::domain::Role;

/// Header carrying the caller's role, set by the upstream authentication layer
pub const ROLE_HEADER: &str = "x-user-role";

/// Rejects requests whose role may not reach the requested path
pub async fn route_access_middleware(request: Request<Body>, next: Next) -> Response {
    let path = request.uri().path();

    if is_public_path(path) {
        return next.run(request).await;
    }

    let role = match role_from_headers(request.headers()) {
        Ok(role) => role,
        Err(err) => return err.into_response(),
    };

    if !can_access_route(role, path) {
        debug!(path = %path, role = ?role, "Route access denied");

        return match role {
            Some(_) => ApiError::forbidden("Access denied for this route").into_response(),
            None => ApiError::unauthorized("Authentication required").into_response(),
        };
    }

    next.run(request).await
}

fn role_from_headers(headers: &HeaderMap) -> Result<Option<Role>, ApiError> {
    let Some(value) = headers.get(ROLE_HEADER) else {
        return Ok(None);
    };

    let value = value
        .to_str()
        .map_err(|_| ApiError::bad_request("Invalid role header encoding").with_param(ROLE_HEADER))?;

    value
        .trim()
        .parse::<Role>()
        .map(Some)
        .map_err(|e| ApiError::bad_request(e.to_string()).with_param(ROLE_HEADER))
}
