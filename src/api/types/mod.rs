//! API request, response and error types

pub mod error;
pub mod json;
pub mod similarity;

pub use error::{ApiError, ApiErrorResponse};
pub use json::Json;
pub use similarity::{CheckSimilarRequest, CheckSimilarResponse};
