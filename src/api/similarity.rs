//! Similar-report check endpoint

use axum::extract::State;
use tracing::debug;

use crate::api::state::AppState;
use crate::api::types::{ApiError, CheckSimilarRequest, CheckSimilarResponse, Json};

/// POST /api/check-similar-report
pub async fn check_similar_report(
    State(state): State<AppState>,
    Json(request): Json<CheckSimilarRequest>,
) -> Result<Json<CheckSimilarResponse>, ApiError> {
    let query = request
        .query_text()
        .ok_or_else(|| ApiError::bad_request("Missing or invalid query").with_param("query"))?;

    let check = state
        .similarity_service
        .check(query)
        .await
        .map_err(ApiError::from)?;

    debug!(
        key = %check.key,
        outcome = check.outcome.as_str(),
        results = check.reports.len(),
        "Similarity check completed"
    );

    Ok(Json(CheckSimilarResponse::from(check)))
}
