use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::guardrail::Violation;

/// HTTP-facing failure envelope. Rate and quota rejections map to 429 with
/// the flag the web client keys on; other guardrail violations are 400s.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("rate limit exceeded. Please wait a few seconds before trying again.")]
    RateLimited,

    #[error("daily API limit reached. Please try again tomorrow.")]
    QuotaExhausted,

    #[error("invalid query: {0}")]
    InvalidQuery(Violation),
}

impl From<Violation> for ApiError {
    fn from(violation: Violation) -> Self {
        match violation {
            Violation::RateLimited => ApiError::RateLimited,
            other => ApiError::InvalidQuery(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            ApiError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                serde_json::json!({
                    "error": self.to_string(),
                    "rate_limited": true,
                }),
            ),
            ApiError::QuotaExhausted => (
                StatusCode::TOO_MANY_REQUESTS,
                serde_json::json!({
                    "error": self.to_string(),
                    "api_limited": true,
                }),
            ),
            ApiError::InvalidQuery(_) => (
                StatusCode::BAD_REQUEST,
                serde_json::json!({
                    "error": self.to_string(),
                }),
            ),
        };

        (status, Json(body)).into_response()
    }
}
