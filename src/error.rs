use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors surfaced at the HTTP boundary.
///
/// A passcode mismatch is deliberately not represented here: a wrong code is
/// a normal verification outcome, built directly in the handler.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Required auth field missing or empty. No side effects have occurred.
    #[error("{0}")]
    Validation(String),

    /// Classify request rejected before any upstream call.
    #[error("{0}")]
    ClassifyValidation(String),

    /// Classifier unreachable, timed out, or answered non-2xx. The wire body
    /// stays generic; the underlying message goes into `details` only.
    #[error("classification failed: {0}")]
    Upstream(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(message) => {
                (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
            }
            ApiError::ClassifyValidation(message) => (
                StatusCode::BAD_REQUEST,
                Json(json!({ "ok": false, "error": message })),
            )
                .into_response(),
            ApiError::Upstream(details) => {
                tracing::error!(error = %details, "upstream classification failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "ok": false,
                        "error": "classification failed",
                        "details": details,
                    })),
                )
                    .into_response()
            }
        }
    }
}
