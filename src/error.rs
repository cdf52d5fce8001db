use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-boundary error taxonomy.
///
/// Every service error is converted to one of these variants at the handler
/// boundary and rendered as a JSON body; upstream failures never propagate
/// as unhandled faults. Details of 500s are logged server-side only.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not authenticated")]
    Unauthorized,

    #[error("Forbidden")]
    Forbidden,

    #[error("Premium subscription required")]
    PremiumRequired,

    #[error("Daily limit reached")]
    QuotaExceeded { count: u32, limit: u32 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Upstream failure: {0}")]
    Upstream(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "Not authenticated" }),
            ),
            AppError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "Forbidden" })),
            AppError::PremiumRequired => (
                StatusCode::FORBIDDEN,
                json!({ "error": "Premium subscription required" }),
            ),
            AppError::QuotaExceeded { count, limit } => (
                StatusCode::FORBIDDEN,
                json!({
                    "error": "Daily comment limit reached",
                    "limitReached": true,
                    "todayCommentCount": count,
                    "limit": limit,
                }),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            AppError::Upstream(detail) => {
                tracing::error!("upstream failure: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<crate::store::RowStoreError> for AppError {
    fn from(err: crate::store::RowStoreError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

// Store misses are surfaced as generic failures, not a distinct 404.
impl From<crate::repositories::RepositoryError> for AppError {
    fn from(err: crate::repositories::RepositoryError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}
