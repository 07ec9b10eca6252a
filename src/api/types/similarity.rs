//! Request and response bodies for the similar-report check

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::report::Report;
use crate::infrastructure::services::SimilarityCheck;

/// Body of `POST /api/check-similar-report`
///
/// `query` is kept untyped so that a missing or non-string value is
/// reported as a validation error instead of a body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckSimilarRequest {
    #[serde(default)]
    pub query: Option<Value>,
}

impl CheckSimilarRequest {
    /// The query text, if present and a string
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_ref().and_then(Value::as_str)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSimilarResponse {
    pub exists: bool,
    pub similar_reports: Vec<Report>,
}

impl From<SimilarityCheck> for CheckSimilarResponse {
    fn from(check: SimilarityCheck) -> Self {
        Self {
            exists: check.exists,
            similar_reports: check.reports,
        }
    }
}
